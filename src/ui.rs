//! User interface rendering functions for all application screens.

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    canvas,
    grid::{Direction, Position},
    session::{Phase, Session},
    solver::{Solver as _, VisitKind},
    types::{Layer, Screen},
    App,
};

/// Key hints shown under the maze.
const IN_GAME_KEYS: &str = "(q) quit / (space) skip / (enter) pause / (n) new maze";

/// Key hints shown under the summary.
const SUMMARY_KEYS: &str = "(q) quit / (space) exit / (n) new maze";

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    match app.screen {
        Screen::InGame => in_game(&app.session, frame)?,
        Screen::Summary => summary(&app.session, frame),
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
pub(crate) fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// One layer of canvas points, already in screen coordinates.
struct Painted {
    /// Screen coordinates of the points.
    coords: Vec<(f64, f64)>,
    /// Color the points are drawn with.
    color: Color,
}

/// Computes every layer of the maze canvas from the session state, bottom layer first.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
fn layers(session: &Session) -> Result<Vec<Painted>> {
    let grid = session.grid();
    let size = canvas::raster_size(grid);
    let mut layers = vec![(Layer::Walls, canvas::wall_raster(grid))];

    if let Some(simulation) = session.simulation() {
        let solver = simulation.solver();
        let visited = solver
            .history()
            .iter()
            .filter(|visit| visit.kind != VisitKind::Start)
            .map(|visit| visit.position)
            .collect::<Vec<Position>>();
        layers.push((Layer::Visited, canvas::route_raster(&visited)));
        layers.push((
            Layer::Route(solver.kind()),
            canvas::route_raster(&solver.route()),
        ));
    }

    layers.push((
        Layer::Endpoints,
        vec![
            canvas::cell_to_raster(session.entrance()),
            canvas::cell_to_raster(session.exit()),
        ],
    ));

    let head = session.carver_head().or_else(|| {
        session
            .simulation()
            .filter(|simulation| !simulation.is_finished())
            .map(|simulation| simulation.solver().position())
    });
    layers.push((
        Layer::Head,
        head.map(canvas::cell_to_raster).into_iter().collect(),
    ));

    layers
        .into_iter()
        .map(|(layer, points)| {
            Ok(Painted {
                coords: canvas::transform_to_screen_coords(&points, size)?,
                color: layer.color(),
            })
        })
        .collect()
}

/// Arrow drawn on the head of a solver that keeps a facing.
const fn facing_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::North => "^",
        Direction::East => ">",
        Direction::South => "v",
        Direction::West => "<",
    }
}

/// Locates the facing arrow of the active solver in screen coordinates.
///
/// Only a running solver that keeps a facing gets one.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
fn heading(session: &Session) -> Result<Option<(f64, f64, &'static str)>> {
    let Some(simulation) = session
        .simulation()
        .filter(|simulation| !simulation.is_finished())
    else {
        return Ok(None);
    };
    let solver = simulation.solver();
    let Some(direction) = solver.facing() else {
        return Ok(None);
    };

    let coords = canvas::transform_to_screen_coords(
        &[canvas::cell_to_raster(solver.position())],
        canvas::raster_size(session.grid()),
    )?;

    Ok(coords
        .first()
        .map(|&(x, y)| (x, y, facing_glyph(direction))))
}

/// Describes the active phase for the status line.
fn status_line(session: &Session) -> String {
    let phase = match session.phase() {
        Phase::Generating => {
            let grid = session.grid();
            format!(
                "Carving {}x{} maze, seed {}",
                grid.rows(),
                grid.cols(),
                session.seed()
            )
        }
        Phase::Solving(kind) => {
            let moves = session
                .simulation()
                .map_or(0, |simulation| simulation.solver().moves());
            format!("{kind}: {moves} moves")
        }
        Phase::Complete => "Done".to_owned(),
    };
    let paused = if session.is_paused() { " [paused]" } else { "" };

    format!(
        "{phase} / {:.1}s{paused}",
        session.phase_elapsed().as_secs_f64()
    )
}

/// Renders the in-game screen with the maze and the progress of the active phase.
///
/// The maze is drawn on a single [`Canvas`] with one layer per [`Layer`], and a status block at the
/// bottom shows the active phase and the key bindings.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations or layout lookups.
pub(crate) fn in_game(session: &Session, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let (width, height) = canvas::terminal_extent(canvas::raster_size(session.grid()))?;

    // Maze area on top, status block at the bottom.
    let overall_layout =
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).split(frame.area());

    let maze_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get maze content area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    let space = centered(maze_content_area, width, height)?;
    let painted = layers(session)?;
    let arrow = heading(session)?;

    let maze = Canvas::default()
        .x_bounds(canvas::bounds(f64::from(space.width)))
        .y_bounds(canvas::bounds(f64::from(space.height) * 2.))
        .marker(Marker::HalfBlock)
        .paint(|ctx| {
            for layer in &painted {
                ctx.draw(&Points {
                    coords: &layer.coords,
                    color: layer.color,
                });
                ctx.layer();
            }
            if let Some((x, y, glyph)) = arrow {
                ctx.print(x, y, Line::styled(glyph, Layer::Head.color()));
            }
        });

    frame.render_widget(maze, space);

    let status_block = Block::bordered()
        .title(IN_GAME_KEYS)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let status_inner = status_block.inner(status_area);

    frame.render_widget(status_block, status_area);
    frame.render_widget(Line::raw(status_line(session)).centered(), status_inner);

    Ok(())
}

/// Returns an area of at most `width` x `height` cells centered in `area`.
///
/// # Errors
///
/// This function may return errors if the layout does not produce the middle slot.
fn centered(area: Rect, width: u16, height: u16) -> Result<Rect> {
    let row = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area)
        .first()
        .copied()
        .ok_or_eyre("failed to get maze row from layout")?;

    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(row)
        .first()
        .copied()
        .ok_or_eyre("failed to get maze space from layout")
}

/// Renders the summary screen with the figures of every phase.
///
/// The layout follows the centered menu boxes: a rounded block sized to its content with the key
/// bindings in the bottom border.
pub(crate) fn summary(session: &Session, frame: &mut Frame) {
    clear(frame);

    let text = session.summary().to_string();
    let lines = text.lines().map(Line::raw).collect::<Vec<Line<'_>>>();
    let content_width = lines
        .iter()
        .map(Line::width)
        .chain([SUMMARY_KEYS.len()])
        .max()
        .unwrap_or_default();

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let width = u16::try_from(content_width + 4).unwrap_or(u16::MAX);

    let area = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(frame.area());
    let Some(area) = area.first().copied() else {
        return;
    };
    let area = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(area);
    let Some(area) = area.first().copied() else {
        return;
    };

    let block = Block::bordered()
        .title("Summary")
        .title_bottom(SUMMARY_KEYS)
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);

    frame.render_widget(block, area);

    let rows = Layout::vertical(vec![Constraint::Max(1); lines.len()]).split(inner);
    for (line, row) in lines.into_iter().zip(rows.iter()) {
        frame.render_widget(line.centered(), *row);
    }
}
