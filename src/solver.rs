//! Step-wise maze solvers.
//!
//! Every solver implements [`Solver`] and advances by exactly one move per [`Solver::step`] call,
//! so the caller decides the cadence. [`AnySolver`] dispatches over the concrete solvers by enum
//! so the driver can switch between them without boxing.

pub mod path;
pub mod right_hand;

use std::fmt;

use crate::{
    error::MazeError,
    grid::{Direction, Position},
    maze::Maze,
};

use self::{path::PathSolver, right_hand::RightHandSolver};

/// How the solver arrived at a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitKind {
    /// The entrance, recorded on reset.
    Start,
    /// A move into a cell further along the search.
    Advance,
    /// A move back out of a dead end.
    Retreat,
}

/// One entry of a solver's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visit {
    /// Cell the solver stood on after the move.
    pub position: Position,
    /// Nature of the move.
    pub kind: VisitKind,
}

impl Visit {
    /// Builds a history entry.
    #[must_use]
    pub const fn new(position: Position, kind: VisitKind) -> Self {
        Self { position, kind }
    }
}

/// Lifecycle of a solving run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Still searching.
    Running,
    /// Standing on the exit.
    Solved,
    /// No further progress is possible.
    Stuck,
}

/// What a single call to [`Solver::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved forward into the given cell.
    Advanced(Position),
    /// Moved back into the given cell.
    Retreated(Position),
    /// The solver had already finished; nothing changed.
    Idle,
}

/// Common contract of the step-wise solvers.
pub trait Solver {
    /// Advances by exactly one move. Once the solver is done this is a no-op returning
    /// [`StepOutcome::Idle`].
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::Stuck`] the one time the solver finds that the exit cannot be
    /// reached. This never happens on a generated maze.
    fn step(&mut self, maze: &Maze) -> Result<StepOutcome, MazeError>;

    /// Current lifecycle state.
    fn status(&self) -> Status;

    /// Cell the solver currently stands on.
    fn position(&self) -> Position;

    /// Every cell stood on so far, starting with the entrance.
    fn history(&self) -> &[Visit];

    /// Net path from the entrance to the current position, with dead ends removed.
    fn route(&self) -> Vec<Position>;

    /// Discards all progress and starts over at the entrance of `maze`.
    fn reset(&mut self, maze: &Maze);

    /// Whether the solver solved the maze or gave up.
    fn is_done(&self) -> bool {
        self.status() != Status::Running
    }

    /// Number of moves made since the last reset.
    fn moves(&self) -> usize {
        self.history().len().saturating_sub(1)
    }
}

/// Selects one of the available solvers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolverKind {
    /// Depth-first search with backtracking.
    Path,
    /// Right-hand wall follower.
    RightHand,
}

impl SolverKind {
    /// Creates the selected solver, reset at the entrance of `maze`.
    #[must_use]
    pub fn start(self, maze: &Maze) -> AnySolver {
        match self {
            Self::Path => AnySolver::Path(PathSolver::new(maze)),
            Self::RightHand => AnySolver::RightHand(RightHandSolver::new(maze)),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Path => "Path solver",
            Self::RightHand => "Right-hand solver",
        })
    }
}

/// Enum dispatch over the concrete solvers.
#[derive(Clone, Debug)]
pub enum AnySolver {
    /// A [`PathSolver`].
    Path(PathSolver),
    /// A [`RightHandSolver`].
    RightHand(RightHandSolver),
}

impl AnySolver {
    /// Which solver this is.
    #[must_use]
    pub const fn kind(&self) -> SolverKind {
        match self {
            Self::Path(_) => SolverKind::Path,
            Self::RightHand(_) => SolverKind::RightHand,
        }
    }

    /// Direction the solver faces, for solvers that keep one.
    #[must_use]
    pub const fn facing(&self) -> Option<Direction> {
        match self {
            Self::Path(_) => None,
            Self::RightHand(solver) => Some(solver.facing()),
        }
    }
}

impl Solver for AnySolver {
    fn step(&mut self, maze: &Maze) -> Result<StepOutcome, MazeError> {
        match self {
            Self::Path(solver) => solver.step(maze),
            Self::RightHand(solver) => solver.step(maze),
        }
    }

    fn status(&self) -> Status {
        match self {
            Self::Path(solver) => solver.status(),
            Self::RightHand(solver) => solver.status(),
        }
    }

    fn position(&self) -> Position {
        match self {
            Self::Path(solver) => solver.position(),
            Self::RightHand(solver) => solver.position(),
        }
    }

    fn history(&self) -> &[Visit] {
        match self {
            Self::Path(solver) => solver.history(),
            Self::RightHand(solver) => solver.history(),
        }
    }

    fn route(&self) -> Vec<Position> {
        match self {
            Self::Path(solver) => solver.route(),
            Self::RightHand(solver) => solver.route(),
        }
    }

    fn reset(&mut self, maze: &Maze) {
        match self {
            Self::Path(solver) => solver.reset(maze),
            Self::RightHand(solver) => solver.reset(maze),
        }
    }
}

/// Reduces a walk to its loop-erased path: whenever the walk comes back to a cell already on the
/// path, everything after that cell is dropped.
pub(crate) fn erase_loops<I>(walk: I) -> Vec<Position>
where
    I: IntoIterator<Item = Position>,
{
    let mut path: Vec<Position> = Vec::new();

    for position in walk {
        if let Some(index) = path.iter().position(|seen| *seen == position) {
            path.truncate(index + 1);
        } else {
            path.push(position);
        }
    }

    path
}
