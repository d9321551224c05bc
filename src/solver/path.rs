//! Depth-first path solver with backtracking.

use log::{debug, warn};

use crate::{
    error::MazeError,
    grid::{Direction, Position},
    maze::Maze,
    solver::{Solver, Status, StepOutcome, Visit, VisitKind},
};

/// A cell on the search stack with the directions it has not tried yet.
#[derive(Clone, Debug)]
struct Frame {
    /// Cell of the frame.
    position: Position,
    /// Remaining directions, consumed from the back so north is tried first.
    untried: Vec<Direction>,
}

impl Frame {
    /// Frame for a freshly entered cell.
    fn new(position: Position) -> Self {
        Self {
            position,
            untried: Direction::ALL.into_iter().rev().collect(),
        }
    }
}

/// Depth-first search that moves one cell per step and walks back out of dead ends.
///
/// The cells left on the stack always form the net path from the entrance, so once the exit is
/// reached the stack is the solution.
#[derive(Clone, Debug)]
pub struct PathSolver {
    /// Search stack, entrance at the bottom.
    stack: Vec<Frame>,
    /// Cells entered since the last reset, indexed like the grid.
    visited: Vec<bool>,
    /// Every cell stood on, advances and retreats alike.
    history: Vec<Visit>,
    /// Cell currently stood on.
    position: Position,
    /// Lifecycle state.
    status: Status,
}

impl PathSolver {
    /// Creates a solver reset at the entrance of `maze`.
    #[must_use]
    pub fn new(maze: &Maze) -> Self {
        let mut solver = Self {
            stack: Vec::new(),
            visited: Vec::new(),
            history: Vec::new(),
            position: maze.entrance(),
            status: Status::Running,
        };
        solver.reset(maze);
        solver
    }

    /// Marks `position` entered and pushes its frame.
    fn enter(&mut self, maze: &Maze, position: Position) {
        if let Some(flag) = maze
            .grid()
            .index(position)
            .and_then(|index| self.visited.get_mut(index))
        {
            *flag = true;
        }
        self.stack.push(Frame::new(position));
        self.position = position;
    }
}

impl Solver for PathSolver {
    fn step(&mut self, maze: &Maze) -> Result<StepOutcome, MazeError> {
        if self.is_done() {
            return Ok(StepOutcome::Idle);
        }
        let Some(frame) = self.stack.last_mut() else {
            self.status = Status::Stuck;
            return Err(MazeError::Stuck(self.position));
        };
        let from = frame.position;
        let grid = maze.grid();

        let next = loop {
            let Some(direction) = frame.untried.pop() else {
                break None;
            };
            if !grid.is_open(from, direction) {
                continue;
            }
            let Some(to) = grid.neighbor(from, direction) else {
                continue;
            };
            let unvisited = grid
                .index(to)
                .and_then(|index| self.visited.get(index))
                .is_some_and(|seen| !*seen);
            if unvisited {
                break Some(to);
            }
        };

        if let Some(to) = next {
            self.enter(maze, to);
            self.history.push(Visit::new(to, VisitKind::Advance));
            if to == maze.exit() {
                self.status = Status::Solved;
                debug!(
                    "path solver reached {to} after {} moves, net path {}",
                    self.moves(),
                    self.stack.len()
                );
            }
            return Ok(StepOutcome::Advanced(to));
        }

        let _ = self.stack.pop();
        if let Some(top) = self.stack.last().map(|frame| frame.position) {
            self.position = top;
            self.history.push(Visit::new(top, VisitKind::Retreat));
            Ok(StepOutcome::Retreated(top))
        } else {
            self.status = Status::Stuck;
            warn!("path solver exhausted the search space at {from}");
            Err(MazeError::Stuck(from))
        }
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
        self.stack.iter().map(|frame| frame.position).collect()
    }

    fn reset(&mut self, maze: &Maze) {
        let entrance = maze.entrance();

        self.stack.clear();
        self.visited = vec![false; maze.grid().cell_count()];
        self.history = vec![Visit::new(entrance, VisitKind::Start)];
        self.enter(maze, entrance);
        self.status = if entrance == maze.exit() {
            Status::Solved
        } else {
            Status::Running
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    /// A 2x2 maze shaped like a U: (0,0) - (1,0) - (1,1) - (0,1), with the exit at (0,1).
    fn u_shaped() -> Maze {
        let mut grid = Grid::new(2, 2).expect("2x2 grid should be valid");
        grid.open_between(Position::new(0, 0), Position::new(1, 0))
            .expect("cells are adjacent");
        grid.open_between(Position::new(1, 0), Position::new(1, 1))
            .expect("cells are adjacent");
        grid.open_between(Position::new(1, 1), Position::new(0, 1))
            .expect("cells are adjacent");
        Maze::from_parts(grid, Position::new(0, 0), Position::new(0, 1))
            .expect("cells are inside the grid")
    }

    /// A T junction: the entrance (0,1) leads south to (1,1), which branches east to (1,2), the
    /// exit, and west to the dead end (1,0).
    fn t_junction() -> Maze {
        let mut grid = Grid::new(2, 3).expect("2x3 grid should be valid");
        grid.open_between(Position::new(0, 1), Position::new(1, 1))
            .expect("cells are adjacent");
        grid.open_between(Position::new(1, 1), Position::new(1, 0))
            .expect("cells are adjacent");
        grid.open_between(Position::new(1, 1), Position::new(1, 2))
            .expect("cells are adjacent");
        Maze::from_parts(grid, Position::new(0, 1), Position::new(1, 0))
            .expect("cells are inside the grid")
    }

    #[test]
    fn test_follows_the_only_corridor() {
        let maze = u_shaped();
        let mut solver = PathSolver::new(&maze);

        let steps: Vec<StepOutcome> = (0..3)
            .map(|_| solver.step(&maze).expect("the exit is reachable"))
            .collect();

        assert_eq!(
            steps,
            vec![
                StepOutcome::Advanced(Position::new(1, 0)),
                StepOutcome::Advanced(Position::new(1, 1)),
                StepOutcome::Advanced(Position::new(0, 1)),
            ]
        );
        assert_eq!(solver.status(), Status::Solved);
        assert_eq!(solver.route().len(), 4);
    }

    #[test]
    fn test_backtracks_out_of_dead_ends() {
        let maze = t_junction();
        let mut solver = PathSolver::new(&maze);

        // East is tried before west, so the search first walks into (1,2) and has to come back.
        let mut outcomes = Vec::new();
        while !solver.is_done() {
            outcomes.push(solver.step(&maze).expect("the exit is reachable"));
        }

        assert_eq!(
            outcomes,
            vec![
                StepOutcome::Advanced(Position::new(1, 1)),
                StepOutcome::Advanced(Position::new(1, 2)),
                StepOutcome::Retreated(Position::new(1, 1)),
                StepOutcome::Advanced(Position::new(1, 0)),
            ]
        );
        assert_eq!(
            solver.route(),
            vec![Position::new(0, 1), Position::new(1, 1), Position::new(1, 0)]
        );
        assert_eq!(
            solver
                .history()
                .iter()
                .filter(|visit| visit.kind == VisitKind::Retreat)
                .count(),
            1
        );
        assert_eq!(solver.moves(), 4);
    }

    #[test]
    fn test_exhausted_search_is_stuck() {
        let grid = Grid::new(1, 2).expect("1x2 grid should be valid");
        let maze = Maze::from_parts(grid, Position::new(0, 0), Position::new(0, 1))
            .expect("cells are inside the grid");
        let mut solver = PathSolver::new(&maze);

        assert_eq!(
            solver.step(&maze),
            Err(MazeError::Stuck(Position::new(0, 0)))
        );
        assert_eq!(solver.status(), Status::Stuck);
        assert!(solver.route().is_empty());
    }
}
