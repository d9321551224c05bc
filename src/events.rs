//! Event handling functions for user input and application state updates.

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{types::Screen, App};

/// Handles input events and advances the animation.
///
/// This function polls for keyboard events for at most one animation tick and dispatches them to
/// the appropriate handler, then lets the session advance if its tick is due.
///
/// # Errors
///
/// - [`std::io::Error`] from polling the terminal.
/// - Any error from the handlers or from the session.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(app.poll_timeout())? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code)?;
            }
        }
    }

    app.advance()?;

    Ok(())
}

/// Dispatches a single key press.
///
/// # Errors
///
/// This function may return errors from the session when skipping or restarting.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char(' ') => handle_space(app)?,
        KeyCode::Enter => handle_enter(app),
        KeyCode::Char('n') => app.restart()?,
        _ => {}
    }

    Ok(())
}

/// Handles space key presses.
///
/// In game this finishes the active phase at once, on the summary it leaves the application.
///
/// # Errors
///
/// This function may return errors from the session.
pub(crate) fn handle_space(app: &mut App) -> Result<()> {
    match app.screen {
        Screen::InGame => {
            app.session.skip_phase()?;
            if app.session.is_complete() {
                app.screen = Screen::Summary;
            }
        }
        Screen::Summary => app.exit = true,
    }

    Ok(())
}

/// Handles enter key presses, which pause and resume the animation.
pub(crate) fn handle_enter(app: &mut App) {
    if app.screen == Screen::InGame {
        app.session.toggle_pause();
    }
}
