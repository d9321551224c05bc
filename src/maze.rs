//! Maze data and generation entry point.
//!
//! A [`Maze`] wraps a carved [`Grid`] together with its entrance and exit. Generated mazes are
//! perfect: the open passages form a spanning tree, so there is exactly one simple path between
//! any two cells.

pub mod carver;

use std::collections::VecDeque;

use log::info;

use crate::{
    error::MazeError,
    grid::{Grid, Position, Walls},
};

use self::carver::Carver;

/// A carved grid with an entrance and an exit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    /// Wall topology.
    grid: Grid,
    /// Where the solvers start.
    entrance: Position,
    /// Where the solvers stop.
    exit: Position,
    /// Seed the grid was carved from, if it was generated.
    seed: Option<u64>,
}

impl Maze {
    /// Builds a maze from an already carved grid.
    ///
    /// Nothing checks that the grid is a perfect maze, which is what makes this useful for
    /// exercising the solvers on hand-built or malformed layouts.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] when the entrance or the exit lies outside the grid.
    pub fn from_parts(grid: Grid, entrance: Position, exit: Position) -> Result<Self, MazeError> {
        for position in [entrance, exit] {
            if !grid.contains(position) {
                return Err(MazeError::OutOfBounds(position));
            }
        }

        Ok(Self {
            grid,
            entrance,
            exit,
            seed: None,
        })
    }

    /// Wraps a grid produced by the carver. The entrance is the top-left corner and the exit the
    /// opposite corner.
    pub(crate) const fn carved(grid: Grid, entrance: Position, exit: Position, seed: u64) -> Self {
        Self {
            grid,
            entrance,
            exit,
            seed: Some(seed),
        }
    }

    /// Wall topology of the maze.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell the solvers start from.
    #[must_use]
    pub const fn entrance(&self) -> Position {
        self.entrance
    }

    /// Cell the solvers are looking for.
    #[must_use]
    pub const fn exit(&self) -> Position {
        self.exit
    }

    /// Seed the maze was generated from, `None` for hand-built mazes.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Wall mask of the cell at `position`.
    #[must_use]
    pub fn walls(&self, position: Position) -> Option<Walls> {
        self.grid.walls(position)
    }

    /// Shortest entrance-to-exit path through open passages, both ends included.
    ///
    /// On a perfect maze this is the only simple path. Returns `None` when the exit cannot be
    /// reached.
    #[must_use]
    pub fn solution(&self) -> Option<Vec<Position>> {
        let mut parents: Vec<Option<Position>> = vec![None; self.grid.cell_count()];
        let mut seen = vec![false; self.grid.cell_count()];
        let mut queue = VecDeque::from([self.entrance]);
        let _ = mark(&self.grid, &mut seen, self.entrance);

        while let Some(current) = queue.pop_front() {
            if current == self.exit {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(parent) = self
                    .grid
                    .index(cursor)
                    .and_then(|index| parents.get(index).copied().flatten())
                {
                    path.push(parent);
                    cursor = parent;
                }
                path.reverse();
                return Some(path);
            }

            for next in self.grid.open_neighbors(current) {
                if mark(&self.grid, &mut seen, next) {
                    if let Some(slot) = self
                        .grid
                        .index(next)
                        .and_then(|index| parents.get_mut(index))
                    {
                        *slot = Some(current);
                    }
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

/// Marks `position` as seen, returning whether it was unseen before.
fn mark(grid: &Grid, seen: &mut [bool], position: Position) -> bool {
    match grid.index(position).and_then(|index| seen.get_mut(index)) {
        Some(flag) if !*flag => {
            *flag = true;
            true
        }
        _ => false,
    }
}

/// Generates a perfect maze by randomized depth-first carving.
///
/// The entrance is the top-left corner and the exit the bottom-right corner. The same `seed`
/// always yields the same layout; without one a seed is drawn at random and kept on the maze.
///
/// # Errors
///
/// Returns [`MazeError::InvalidDimension`] when `rows` or `cols` is zero.
pub fn generate(rows: usize, cols: usize, seed: Option<u64>) -> Result<Maze, MazeError> {
    let mut carver = Carver::new(rows, cols, seed)?;
    let maze = carver.finish()?;
    info!(
        "generated {rows}x{cols} maze from seed {}",
        maze.seed.unwrap_or_default()
    );

    Ok(maze)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts the cells reachable from the entrance through open passages.
    fn reachable_cells(maze: &Maze) -> usize {
        let mut seen = vec![false; maze.grid().cell_count()];
        let mut stack = vec![maze.entrance()];
        let _ = mark(maze.grid(), &mut seen, maze.entrance());
        let mut count = 0;

        while let Some(current) = stack.pop() {
            count += 1;
            for next in maze.grid().open_neighbors(current) {
                if mark(maze.grid(), &mut seen, next) {
                    stack.push(next);
                }
            }
        }

        count
    }

    /// Collects the raw wall bits of every cell in row-major order.
    fn layout(maze: &Maze) -> Vec<u8> {
        maze.grid()
            .positions()
            .filter_map(|position| maze.walls(position))
            .map(Walls::bits)
            .collect()
    }

    #[test]
    fn test_generate_produces_spanning_tree() {
        for (rows, cols) in [(1, 1), (1, 7), (6, 1), (2, 2), (5, 8), (15, 25)] {
            for seed in 0..5 {
                let maze = generate(rows, cols, Some(seed)).expect("dimensions are positive");
                let cells = rows * cols;

                assert_eq!(
                    maze.grid().passage_count(),
                    cells - 1,
                    "{rows}x{cols} seed {seed} should have exactly cells - 1 passages"
                );
                assert_eq!(
                    reachable_cells(&maze),
                    cells,
                    "{rows}x{cols} seed {seed} should be fully connected"
                );
            }
        }
    }

    #[test]
    fn test_generate_keeps_walls_consistent() {
        let maze = generate(9, 11, Some(42)).expect("dimensions are positive");
        let grid = maze.grid();

        for position in grid.positions() {
            for direction in crate::grid::Direction::ALL {
                if let Some(next) = grid.neighbor(position, direction) {
                    assert_eq!(
                        grid.is_open(position, direction),
                        grid.is_open(next, direction.turn_back()),
                        "boundary between {position} and {next} disagrees"
                    );
                } else {
                    assert!(
                        grid.walls(position)
                            .is_some_and(|walls| walls.has_wall(direction)),
                        "outer boundary of {position} should stay walled"
                    );
                }
            }
        }
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let first = generate(12, 9, Some(7)).expect("dimensions are positive");
        let second = generate(12, 9, Some(7)).expect("dimensions are positive");

        assert_eq!(first, second);
        assert_eq!(first.seed(), Some(7));
    }

    #[test]
    fn test_generate_records_random_seed() {
        let maze = generate(6, 6, None).expect("dimensions are positive");
        let seed = maze.seed().expect("generated mazes always carry their seed");
        let replay = generate(6, 6, Some(seed)).expect("dimensions are positive");

        assert_eq!(maze, replay, "replaying the recorded seed should rebuild the maze");
    }

    #[test]
    fn test_generate_corners() {
        let maze = generate(4, 7, Some(3)).expect("dimensions are positive");

        assert_eq!(maze.entrance(), Position::new(0, 0));
        assert_eq!(maze.exit(), Position::new(3, 6));
        assert_eq!(maze.rows(), 4);
        assert_eq!(maze.cols(), 7);
    }

    #[test]
    fn test_generate_single_cell() {
        let maze = generate(1, 1, Some(0)).expect("1x1 is a valid maze");

        assert_eq!(maze.entrance(), maze.exit());
        assert_eq!(maze.walls(Position::new(0, 0)), Some(Walls::ALL));
        assert_eq!(maze.solution(), Some(vec![Position::new(0, 0)]));
    }

    #[test]
    fn test_generate_rejects_zero_dimensions() {
        assert_eq!(
            generate(0, 3, Some(1)),
            Err(MazeError::InvalidDimension { rows: 0, cols: 3 })
        );
        assert_eq!(
            generate(3, 0, None),
            Err(MazeError::InvalidDimension { rows: 3, cols: 0 })
        );
    }

    #[test]
    fn test_generate_two_by_two_layout() {
        // The four spanning trees of a 2x2 grid, one per removed edge.
        let trees: [[u8; 4]; 4] = [
            [11, 11, 12, 6],
            [13, 3, 13, 6],
            [9, 7, 12, 7],
            [9, 3, 14, 14],
        ];

        let maze = generate(2, 2, Some(2024)).expect("dimensions are positive");
        let cells = layout(&maze);

        assert!(
            trees.iter().any(|tree| tree.as_slice() == cells.as_slice()),
            "2x2 layout {cells:?} is not a spanning tree"
        );
        assert_eq!(
            cells,
            vec![11, 11, 12, 6],
            "seed 2024 carves south, east and then north, leaving only the top passage walled"
        );
        assert_eq!(
            cells,
            layout(&generate(2, 2, Some(2024)).expect("dimensions are positive")),
            "the same seed must reproduce the exact bitmasks"
        );
    }

    #[test]
    fn test_solution_is_unique_tree_path() {
        let maze = generate(10, 10, Some(11)).expect("dimensions are positive");
        let path = maze.solution().expect("generated mazes are connected");

        assert_eq!(path.first(), Some(&maze.entrance()));
        assert_eq!(path.last(), Some(&maze.exit()));
        for pair in path.windows(2) {
            if let [from, to] = pair {
                assert!(
                    maze.grid().open_neighbors(*from).any(|next| next == *to),
                    "{from} and {to} should be joined by a passage"
                );
            }
        }
    }

    #[test]
    fn test_from_parts_validates_coordinates() {
        let grid = Grid::new(2, 3).expect("2x3 grid should be valid");

        assert_eq!(
            Maze::from_parts(grid.clone(), Position::new(0, 0), Position::new(2, 0)),
            Err(MazeError::OutOfBounds(Position::new(2, 0)))
        );

        let maze = Maze::from_parts(grid, Position::new(0, 0), Position::new(1, 2))
            .expect("both corners are inside the grid");
        assert_eq!(maze.seed(), None);
        assert_eq!(maze.solution(), None, "a fully walled grid has no solution");
    }
}
