//! Right-hand wall follower.
//!
//! Keeping one hand on the wall only works on simply connected mazes. Generated mazes are spanning
//! trees and qualify; on anything else the walk may circle forever, which the step budget catches.

use log::{debug, warn};

use crate::{
    error::MazeError,
    grid::{Direction, Position},
    maze::Maze,
    solver::{erase_loops, Solver, Status, StepOutcome, Visit, VisitKind},
};

/// Direction the solver faces when it starts at the entrance.
pub const INITIAL_FACING: Direction = Direction::East;

/// Walks the maze preferring right turns, then straight on, then left, then turning around.
#[derive(Clone, Debug)]
pub struct RightHandSolver {
    /// Cell currently stood on.
    position: Position,
    /// Direction of the last move.
    facing: Direction,
    /// Every cell stood on.
    history: Vec<Visit>,
    /// Lifecycle state.
    status: Status,
    /// Moves allowed before the walk is declared to be circling. The walk state is a cell and a
    /// facing, so four moves per cell cover every state once.
    budget: usize,
}

impl RightHandSolver {
    /// Creates a solver reset at the entrance of `maze`.
    #[must_use]
    pub fn new(maze: &Maze) -> Self {
        let mut solver = Self {
            position: maze.entrance(),
            facing: INITIAL_FACING,
            history: Vec::new(),
            status: Status::Running,
            budget: 0,
        };
        solver.reset(maze);
        solver
    }

    /// Direction the solver currently faces.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Marks the run stuck and builds the matching error.
    fn stuck(&mut self, reason: &str) -> MazeError {
        self.status = Status::Stuck;
        warn!("right-hand solver stuck at {}: {reason}", self.position);
        MazeError::Stuck(self.position)
    }
}

impl Solver for RightHandSolver {
    fn step(&mut self, maze: &Maze) -> Result<StepOutcome, MazeError> {
        if self.is_done() {
            return Ok(StepOutcome::Idle);
        }
        if self.moves() >= self.budget {
            return Err(self.stuck("step budget exhausted, the walk is circling"));
        }

        let grid = maze.grid();
        let preferences = [
            self.facing.turn_right(),
            self.facing,
            self.facing.turn_left(),
            self.facing.turn_back(),
        ];
        let Some((direction, next)) = preferences.into_iter().find_map(|direction| {
            if grid.is_open(self.position, direction) {
                grid.neighbor(self.position, direction)
                    .map(|next| (direction, next))
            } else {
                None
            }
        }) else {
            return Err(self.stuck("walled in on every side"));
        };

        let kind = if direction == self.facing.turn_back() {
            VisitKind::Retreat
        } else {
            VisitKind::Advance
        };
        self.position = next;
        self.facing = direction;
        self.history.push(Visit::new(next, kind));

        if next == maze.exit() {
            self.status = Status::Solved;
            debug!("right-hand solver reached {next} after {} moves", self.moves());
        }

        Ok(match kind {
            VisitKind::Retreat => StepOutcome::Retreated(next),
            VisitKind::Start | VisitKind::Advance => StepOutcome::Advanced(next),
        })
    }

    fn status(&self) -> Status {
        self.status
    }

    fn position(&self) -> Position {
        self.position
    }

    fn history(&self) -> &[Visit] {
        &self.history
    }

    fn route(&self) -> Vec<Position> {
        erase_loops(self.history.iter().map(|visit| visit.position))
    }

    fn reset(&mut self, maze: &Maze) {
        let entrance = maze.entrance();

        self.position = entrance;
        self.facing = INITIAL_FACING;
        self.history = vec![Visit::new(entrance, VisitKind::Start)];
        self.budget = 4 * maze.grid().cell_count();
        self.status = if entrance == maze.exit() {
            Status::Solved
        } else {
            Status::Running
        };
    }
}
