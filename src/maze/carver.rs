//! Step-wise randomized depth-first carving.
//!
//! The carver keeps an explicit stack of frames instead of recursing, so large mazes never run
//! into call-depth limits and the front end can animate one carve per frame.

use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom as _, SeedableRng as _};

use crate::{
    error::MazeError,
    grid::{Direction, Grid, Position},
    maze::Maze,
};

/// What a single call to [`Carver::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarveStep {
    /// A passage was opened and the search moved into a fresh cell.
    Carved {
        /// Cell the passage starts from.
        from: Position,
        /// Newly visited cell.
        to: Position,
    },
    /// A cell ran out of unvisited neighbors and was popped.
    Backtracked {
        /// The cell now on top of the stack, `None` once the stack is empty.
        to: Option<Position>,
    },
    /// Carving had already finished; nothing changed.
    Complete,
}

/// A visited cell whose remaining directions have not all been tried yet.
#[derive(Debug)]
struct Frame {
    /// Cell of the frame.
    position: Position,
    /// Directions still to try, shuffled once on push and consumed from the back.
    untried: Vec<Direction>,
}

/// Randomized DFS carver over a fully walled grid.
#[derive(Debug)]
pub struct Carver {
    /// Grid being carved.
    grid: Grid,
    /// Generation-time visited flags, indexed like the grid.
    visited: Vec<bool>,
    /// DFS stack; the top frame is the cell being extended.
    stack: Vec<Frame>,
    /// Seeded generator driving every shuffle.
    rng: StdRng,
    /// Seed of `rng`, kept for reproducibility.
    seed: u64,
}

impl Carver {
    /// Prepares a carver starting at the top-left corner.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimension`] when `rows` or `cols` is zero.
    pub fn new(rows: usize, cols: usize, seed: Option<u64>) -> Result<Self, MazeError> {
        let grid = Grid::new(rows, cols)?;
        let seed = seed.unwrap_or_else(rand::random);
        let mut carver = Self {
            visited: vec![false; grid.cell_count()],
            grid,
            stack: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        };

        let start = carver.entrance();
        carver.visit(start);
        debug!("carving {rows}x{cols} grid from seed {seed}");

        Ok(carver)
    }

    /// Cell the finished maze will use as entrance.
    #[must_use]
    pub const fn entrance(&self) -> Position {
        Position::new(0, 0)
    }

    /// Cell the finished maze will use as exit, the corner opposite the entrance.
    #[must_use]
    pub const fn exit(&self) -> Position {
        Position::new(self.grid.rows() - 1, self.grid.cols() - 1)
    }

    /// Seed driving this carver.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Grid carved so far.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell currently being extended, `None` once carving is complete.
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.stack.last().map(|frame| frame.position)
    }

    /// Whether every cell has been visited and the stack is empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty()
    }

    /// Performs one carve or one backtrack.
    ///
    /// # Errors
    ///
    /// Propagates [`MazeError::NotAdjacent`] from the grid, which would mean the neighbor
    /// computation is broken.
    pub fn step(&mut self) -> Result<CarveStep, MazeError> {
        let Some(frame) = self.stack.last_mut() else {
            return Ok(CarveStep::Complete);
        };
        let from = frame.position;

        let next = loop {
            let Some(direction) = frame.untried.pop() else {
                break None;
            };
            let Some(to) = self.grid.neighbor(from, direction) else {
                continue;
            };
            let unvisited = self
                .grid
                .index(to)
                .and_then(|index| self.visited.get(index))
                .is_some_and(|seen| !*seen);
            if unvisited {
                break Some(to);
            }
        };

        if let Some(to) = next {
            self.grid.open_between(from, to)?;
            self.visit(to);
            Ok(CarveStep::Carved { from, to })
        } else {
            let _ = self.stack.pop();
            Ok(CarveStep::Backtracked { to: self.head() })
        }
    }

    /// Runs the remaining steps and returns the finished maze. The carver stays complete, so
    /// calling this again yields the same maze.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Carver::step`].
    pub fn finish(&mut self) -> Result<Maze, MazeError> {
        while !self.is_complete() {
            let _ = self.step()?;
        }

        Ok(Maze::carved(
            self.grid.clone(),
            self.entrance(),
            self.exit(),
            self.seed,
        ))
    }

    /// Marks `position` visited and pushes it with a freshly shuffled set of directions.
    fn visit(&mut self, position: Position) {
        if let Some(flag) = self
            .grid
            .index(position)
            .and_then(|index| self.visited.get_mut(index))
        {
            *flag = true;
        }

        let mut untried = Direction::ALL.to_vec();
        untried.shuffle(&mut self.rng);
        self.stack.push(Frame { position, untried });
    }
}
