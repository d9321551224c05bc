//! Raster geometry for drawing a maze on a [`Canvas`](ratatui::widgets::canvas::Canvas).
//!
//! A grid of `rows` x `cols` cells is drawn on a raster of `(2 * cols + 1)` x `(2 * rows + 1)`
//! points. Cell `(row, col)` sits at the odd point `(2 * col + 1, 2 * row + 1)`, the points between
//! two odd coordinates are the walls or passages between cells, and the even-even points are the
//! corner posts. Raster points are `(x, y)` pairs with `y` growing downwards.

use color_eyre::eyre::Result;

use crate::grid::{Direction, Grid, Position};

/// A point on the maze raster as `(x, y)`.
pub(crate) type RasterPoint = (usize, usize);

/// Returns the raster size of `grid` as `(width, height)`.
pub(crate) const fn raster_size(grid: &Grid) -> (usize, usize) {
    (2 * grid.cols() + 1, 2 * grid.rows() + 1)
}

/// Returns the raster point at the center of a cell.
pub(crate) const fn cell_to_raster(position: Position) -> RasterPoint {
    (2 * position.col + 1, 2 * position.row + 1)
}

/// Collects every raster point covered by a wall or a corner post.
pub(crate) fn wall_raster(grid: &Grid) -> Vec<RasterPoint> {
    let (width, height) = raster_size(grid);

    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| is_walled(grid, x, y))
        .collect()
}

/// Checks whether the raster point `(x, y)` is drawn as a wall.
fn is_walled(grid: &Grid, x: usize, y: usize) -> bool {
    let (row, col) = (y / 2, x / 2);

    match (x % 2 == 1, y % 2 == 1) {
        // Corner post.
        (false, false) => true,
        // Cell interior.
        (true, true) => false,
        // Boundary above cell `(row, col)`, or below the last row.
        (true, false) => {
            if row < grid.rows() {
                has_wall(grid, Position::new(row, col), Direction::North)
            } else {
                has_wall(grid, Position::new(row - 1, col), Direction::South)
            }
        }
        // Boundary left of cell `(row, col)`, or right of the last column.
        (false, true) => {
            if col < grid.cols() {
                has_wall(grid, Position::new(row, col), Direction::West)
            } else {
                has_wall(grid, Position::new(row, col - 1), Direction::East)
            }
        }
    }
}

/// Wall lookup that treats cells outside the grid as solid.
fn has_wall(grid: &Grid, position: Position, direction: Direction) -> bool {
    grid.walls(position)
        .is_none_or(|walls| walls.has_wall(direction))
}

/// Turns a sequence of cells into a connected raster trail.
///
/// The passage point between two adjacent cells is filled in so the trail reads as a line. Cells
/// that are not adjacent, which a well-behaved solver never produces, are left unconnected.
pub(crate) fn route_raster(cells: &[Position]) -> Vec<RasterPoint> {
    let mut points = Vec::with_capacity(cells.len() * 2);
    points.extend(cells.first().copied().map(cell_to_raster));

    for pair in cells.windows(2) {
        if let [from, to] = pair {
            if from.row.abs_diff(to.row) + from.col.abs_diff(to.col) == 1 {
                points.push((from.col + to.col + 1, from.row + to.row + 1));
            }
            points.push(cell_to_raster(*to));
        }
    }

    points
}

/// Returns the symmetric canvas bounds that map `points` raster points one to one.
pub(crate) fn bounds(points: f64) -> [f64; 2] {
    let half = (points - 1.) / 2.;
    [-half, half]
}

/// Returns the terminal area needed to show a raster of `size`, as `(columns, rows)`.
///
/// Half-block markers put two raster points in each terminal row.
///
/// # Errors
///
/// This function may return errors when the raster does not fit in a terminal dimension.
pub(crate) fn terminal_extent(size: (usize, usize)) -> Result<(u16, u16)> {
    let (width, height) = size;
    let rows = rounded_div::i32(i32::try_from(height)?, 2);

    Ok((u16::try_from(width)?, u16::try_from(rows)?))
}

/// Transforms raster points to screen coordinates for canvas rendering.
///
/// This function converts raster points `(x, y)` to canvas coordinates centered on the origin using
/// the transformation formulas: coordinate[i] = i - (n - 1) / 2 for columns and coordinate[i] =
/// (n - 1) / 2 - i for rows, so the first raster row ends up at the top.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub(crate) fn transform_to_screen_coords(
    points: &[RasterPoint],
    size: (usize, usize),
) -> Result<Vec<(f64, f64)>> {
    let cols_n = f64::from(u16::try_from(size.0)?);
    let rows_n = f64::from(u16::try_from(size.1)?);

    points
        .iter()
        .map(|&(x, y)| {
            let screen_x = f64::from(u16::try_from(x)?) - (cols_n - 1.) / 2.;
            let screen_y = (rows_n - 1.) / 2. - f64::from(u16::try_from(y)?);

            Ok((screen_x, screen_y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::generate;

    #[test]
    fn test_raster_size() {
        let grid = Grid::new(3, 5).expect("3x5 grid should be valid");

        assert_eq!(raster_size(&grid), (11, 7));
        assert_eq!(cell_to_raster(Position::new(0, 0)), (1, 1));
        assert_eq!(cell_to_raster(Position::new(2, 4)), (9, 5));
    }

    #[test]
    fn test_walled_grid_draws_every_boundary() {
        let grid = Grid::new(1, 2).expect("1x2 grid should be valid");
        let walls = wall_raster(&grid);

        // 5x3 raster minus the two cell interiors.
        assert_eq!(walls.len(), 13);
        assert!(walls.contains(&(2, 1)), "the inner wall should be drawn");
        assert!(!walls.contains(&(1, 1)), "cell interiors are never walls");
    }

    #[test]
    fn test_open_passage_is_not_drawn() {
        let mut grid = Grid::new(1, 2).expect("1x2 grid should be valid");
        grid.open_between(Position::new(0, 0), Position::new(0, 1))
            .expect("cells are adjacent");

        let walls = wall_raster(&grid);

        assert_eq!(walls.len(), 12);
        assert!(!walls.contains(&(2, 1)), "the carved passage should be open");
    }

    #[test]
    fn test_wall_count_of_generated_maze() {
        let maze = generate(4, 6, Some(8)).expect("dimensions are positive");
        let (width, height) = raster_size(maze.grid());
        let cells = maze.rows() * maze.cols();

        assert_eq!(
            wall_raster(maze.grid()).len(),
            width * height - cells - (cells - 1),
            "every cell interior and every passage should be open"
        );
    }

    #[test]
    fn test_route_raster_fills_passages() {
        let cells = [
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ];

        assert_eq!(
            route_raster(&cells),
            vec![(1, 1), (2, 1), (3, 1), (3, 2), (3, 3)]
        );
        assert!(route_raster(&[]).is_empty());
    }

    #[test]
    fn test_route_raster_skips_gaps() {
        let cells = [Position::new(0, 0), Position::new(2, 2)];

        assert_eq!(route_raster(&cells), vec![(1, 1), (5, 5)]);
    }

    #[test]
    fn test_bounds_and_extent() {
        assert_eq!(bounds(5.), [-2., 2.]);
        assert_eq!(
            terminal_extent((51, 31)).expect("the raster fits a terminal"),
            (51, 16)
        );
    }

    #[test]
    fn test_transform_to_screen_coords() {
        let coords = transform_to_screen_coords(&[(0, 0), (2, 1), (4, 2)], (5, 3))
            .expect("small coordinates convert");

        assert_eq!(coords, vec![(-2., 1.), (0., 0.), (2., -1.)]);
    }

    #[test]
    fn test_transform_rejects_oversized_raster() {
        assert!(transform_to_screen_coords(&[(0, 0)], (70_000, 3)).is_err());
    }
}
