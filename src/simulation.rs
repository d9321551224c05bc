//! Tick-driven solver simulation.
//!
//! The external loop owns the cadence: every call to [`Simulation::tick`] performs exactly one
//! solver step. Once the solver is done the final figures are recorded and further ticks do
//! nothing.

use std::{fmt, time::Duration};

use log::{debug, warn};

use crate::{
    error::MazeError,
    maze::Maze,
    solver::{AnySolver, Solver, SolverKind, Status, StepOutcome},
    timer::Stopwatch,
};

/// Final figures of a solving run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Solver that ran.
    pub kind: SolverKind,
    /// How the run ended, either solved or stuck.
    pub status: Status,
    /// Moves made, retreats included.
    pub moves: usize,
    /// Cells on the net entrance-to-final-position path.
    pub route_len: usize,
    /// Running time, pauses excluded.
    pub elapsed: Duration,
}

impl fmt::Display for Outcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match self.status {
            Status::Solved => "solved",
            Status::Stuck => "stuck",
            Status::Running => "running",
        };
        write!(
            formatter,
            "{}: {verdict} after {} moves, route of {} cells, {:.1}s",
            self.kind,
            self.moves,
            self.route_len,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Drives one solver over one maze.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// Maze being solved.
    maze: Maze,
    /// Active solver.
    solver: AnySolver,
    /// Ticks since the solver was started.
    ticks: usize,
    /// Running time of the active solver.
    stopwatch: Stopwatch,
    /// Recorded once the solver is done.
    outcome: Option<Outcome>,
}

impl Simulation {
    /// Starts `kind` at the entrance of `maze`.
    #[must_use]
    pub fn new(maze: Maze, kind: SolverKind) -> Self {
        let solver = kind.start(&maze);
        let mut simulation = Self {
            maze,
            solver,
            ticks: 0,
            stopwatch: Stopwatch::new(),
            outcome: None,
        };
        simulation.record_if_done();
        simulation
    }

    /// Performs one solver step. After completion this is a no-op returning
    /// [`StepOutcome::Idle`].
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::Stuck`] when the solver gives up; the outcome is recorded first.
    pub fn tick(&mut self) -> Result<StepOutcome, MazeError> {
        if self.outcome.is_some() {
            return Ok(StepOutcome::Idle);
        }
        if self.ticks == 0 {
            self.stopwatch.start();
        }
        self.ticks += 1;

        let step = self.solver.step(&self.maze);
        self.record_if_done();
        step
    }

    /// Ticks until the solver is done.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::Stuck`] when the solver gives up.
    pub fn run_to_completion(&mut self) -> Result<Outcome, MazeError> {
        loop {
            if let Some(outcome) = self.outcome {
                return Ok(outcome);
            }
            let _ = self.tick()?;
        }
    }

    /// Discards the current run and starts `kind` afresh at the entrance.
    pub fn switch(&mut self, kind: SolverKind) {
        debug!("switching to {kind}");
        self.solver = kind.start(&self.maze);
        self.ticks = 0;
        self.stopwatch = Stopwatch::new();
        self.outcome = None;
        self.record_if_done();
    }

    /// Freezes the running time.
    pub fn pause(&mut self) {
        self.stopwatch.pause();
    }

    /// Continues the running time, unless the run already ended.
    pub fn resume(&mut self) {
        if self.outcome.is_none() && self.ticks > 0 {
            self.stopwatch.resume();
        }
    }

    /// Maze being solved.
    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Active solver, for rendering.
    #[must_use]
    pub const fn solver(&self) -> &AnySolver {
        &self.solver
    }

    /// Final figures, once the solver is done.
    #[must_use]
    pub const fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Whether the solver is done and further ticks are no-ops.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Ticks since the solver was started.
    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }

    /// Running time of the active solver.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    /// Records the outcome the first time the solver reports it is done.
    fn record_if_done(&mut self) {
        if self.outcome.is_some() || !self.solver.is_done() {
            return;
        }

        self.stopwatch.stop();
        let outcome = Outcome {
            kind: self.solver.kind(),
            status: self.solver.status(),
            moves: self.solver.moves(),
            route_len: self.solver.route().len(),
            elapsed: self.stopwatch.elapsed(),
        };
        if outcome.status == Status::Stuck {
            warn!("{outcome}");
        } else {
            debug!("{outcome}");
        }
        self.outcome = Some(outcome);
    }
}
