//! Phase sequencing for one complete run.
//!
//! A session animates the carving of the maze, then runs every configured solver in turn on the
//! finished maze, and ends with a [`Summary`]. Every phase can be paused or skipped.

use std::{collections::VecDeque, fmt, time::Duration};

use log::{debug, info, warn};

use crate::{
    config::Settings,
    error::MazeError,
    grid::{Grid, Position},
    maze::{carver::Carver, Maze},
    simulation::{Outcome, Simulation},
    solver::SolverKind,
    timer::Stopwatch,
};

/// Which part of the run is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The maze is being carved.
    Generating,
    /// The given solver is walking the maze.
    Solving(SolverKind),
    /// Every solver has finished.
    Complete,
}

/// Work in progress: carving, solving, or a finished maze with nothing left to run.
#[derive(Debug)]
enum Stage {
    /// Carving, one step per tick.
    Generating(Carver),
    /// Solving, one step per tick.
    Solving(Simulation),
    /// Carved maze with no solver configured.
    Idle(Maze),
}

/// Figures of a whole run, shown at the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Number of maze rows.
    pub rows: usize,
    /// Number of maze columns.
    pub cols: usize,
    /// Seed the maze was carved from.
    pub seed: u64,
    /// Time spent carving, pauses excluded.
    pub generation: Duration,
    /// One entry per solver, in the order they ran.
    pub outcomes: Vec<Outcome>,
}

impl fmt::Display for Summary {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Generation: {}x{} maze from seed {}, {:.1}s",
            self.rows,
            self.cols,
            self.seed,
            self.generation.as_secs_f64()
        )?;
        for outcome in &self.outcomes {
            write!(formatter, "\n{outcome}")?;
        }

        Ok(())
    }
}

/// One run: carving, then every configured solver, then the summary.
#[derive(Debug)]
pub struct Session {
    /// Active stage.
    stage: Stage,
    /// Solvers still waiting for their turn.
    queue: VecDeque<SolverKind>,
    /// Outcomes of the solvers that already ran.
    outcomes: Vec<Outcome>,
    /// Carving time.
    generation: Stopwatch,
    /// Whether ticks are currently ignored.
    paused: bool,
    /// Set once the last solver finished.
    complete: bool,
}

impl Session {
    /// Starts carving a maze as described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimension`] when the settings ask for an empty grid.
    pub fn new(settings: &Settings) -> Result<Self, MazeError> {
        let carver = Carver::new(settings.rows, settings.cols, settings.seed)?;
        info!(
            "new {}x{} session with seed {}",
            settings.rows,
            settings.cols,
            carver.seed()
        );
        let mut generation = Stopwatch::new();
        generation.start();

        Ok(Self {
            stage: Stage::Generating(carver),
            queue: settings.solvers.iter().copied().collect(),
            outcomes: Vec::new(),
            generation,
            paused: false,
            complete: false,
        })
    }

    /// Runs `solvers` in order on an already built maze, skipping generation.
    ///
    /// Nothing checks that `maze` is perfect, so this also shows how the solvers cope with
    /// hand-built layouts. The generation time of such a session is zero.
    #[must_use]
    pub fn from_maze(maze: Maze, solvers: &[SolverKind]) -> Self {
        let mut queue = solvers.iter().copied().collect();
        let stage = first_stage(&mut queue, maze);
        let mut session = Self {
            complete: matches!(stage, Stage::Idle(_)),
            stage,
            queue,
            outcomes: Vec::new(),
            generation: Stopwatch::new(),
            paused: false,
        };
        session.settle();
        session
    }

    /// Advances the active phase by one step. Does nothing while paused or once complete.
    ///
    /// A solver that gets stuck ends its phase with a stuck outcome and the next solver starts.
    ///
    /// # Errors
    ///
    /// Returns any error other than [`MazeError::Stuck`], which would mean the core is broken.
    pub fn tick(&mut self) -> Result<(), MazeError> {
        if self.paused || self.complete {
            return Ok(());
        }

        match &mut self.stage {
            Stage::Generating(carver) => {
                let _ = carver.step()?;
                if carver.is_complete() {
                    self.begin_solving()?;
                }
            }
            Stage::Solving(simulation) => {
                tolerate_stuck(simulation.tick().map(|_| ()))?;
                self.settle();
            }
            Stage::Idle(_) => {}
        }

        Ok(())
    }

    /// Finishes the active phase at once and moves on to the next one.
    ///
    /// # Errors
    ///
    /// Same as [`Session::tick`].
    pub fn skip_phase(&mut self) -> Result<(), MazeError> {
        if self.complete {
            return Ok(());
        }

        match &mut self.stage {
            Stage::Generating(_) => self.begin_solving()?,
            Stage::Solving(simulation) => {
                tolerate_stuck(simulation.run_to_completion().map(|_| ()))?;
                self.settle();
            }
            Stage::Idle(_) => {}
        }

        Ok(())
    }

    /// Skips through every remaining phase and returns the summary.
    ///
    /// # Errors
    ///
    /// Same as [`Session::tick`].
    pub fn run_to_end(&mut self) -> Result<Summary, MazeError> {
        while !self.complete {
            self.skip_phase()?;
        }

        Ok(self.summary())
    }

    /// Pauses or resumes the session, freezing the phase timer while paused.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        match (&mut self.stage, self.paused) {
            (Stage::Generating(_), true) => self.generation.pause(),
            (Stage::Generating(_), false) => self.generation.resume(),
            (Stage::Solving(simulation), true) => simulation.pause(),
            (Stage::Solving(simulation), false) => simulation.resume(),
            (Stage::Idle(_), _) => {}
        }
        debug!("session {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Whether ticks are currently ignored.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether every solver has finished.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Active phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match &self.stage {
            _ if self.complete => Phase::Complete,
            Stage::Generating(_) => Phase::Generating,
            Stage::Solving(simulation) => Phase::Solving(simulation.solver().kind()),
            Stage::Idle(_) => Phase::Complete,
        }
    }

    /// Grid as carved so far.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        match &self.stage {
            Stage::Generating(carver) => carver.grid(),
            Stage::Solving(simulation) => simulation.maze().grid(),
            Stage::Idle(maze) => maze.grid(),
        }
    }

    /// Entrance cell.
    #[must_use]
    pub fn entrance(&self) -> Position {
        match &self.stage {
            Stage::Generating(carver) => carver.entrance(),
            Stage::Solving(simulation) => simulation.maze().entrance(),
            Stage::Idle(maze) => maze.entrance(),
        }
    }

    /// Exit cell.
    #[must_use]
    pub fn exit(&self) -> Position {
        match &self.stage {
            Stage::Generating(carver) => carver.exit(),
            Stage::Solving(simulation) => simulation.maze().exit(),
            Stage::Idle(maze) => maze.exit(),
        }
    }

    /// Seed of the maze, zero for hand-built mazes.
    #[must_use]
    pub fn seed(&self) -> u64 {
        match &self.stage {
            Stage::Generating(carver) => carver.seed(),
            Stage::Solving(simulation) => simulation.maze().seed().unwrap_or_default(),
            Stage::Idle(maze) => maze.seed().unwrap_or_default(),
        }
    }

    /// Cell the carver is extending, while generating.
    #[must_use]
    pub fn carver_head(&self) -> Option<Position> {
        match &self.stage {
            Stage::Generating(carver) => carver.head(),
            Stage::Solving(_) | Stage::Idle(_) => None,
        }
    }

    /// Solver simulation, once generation is over.
    #[must_use]
    pub const fn simulation(&self) -> Option<&Simulation> {
        match &self.stage {
            Stage::Generating(_) | Stage::Idle(_) => None,
            Stage::Solving(simulation) => Some(simulation),
        }
    }

    /// Outcomes of the solvers that already finished.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Running time of the active phase, or of the last one once complete.
    #[must_use]
    pub fn phase_elapsed(&self) -> Duration {
        match &self.stage {
            Stage::Generating(_) | Stage::Idle(_) => self.generation.elapsed(),
            Stage::Solving(simulation) => simulation.elapsed(),
        }
    }

    /// Figures gathered so far.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let grid = self.grid();
        Summary {
            rows: grid.rows(),
            cols: grid.cols(),
            seed: self.seed(),
            generation: self.generation.elapsed(),
            outcomes: self.outcomes.clone(),
        }
    }

    /// Finishes carving and hands the maze to the first solver.
    fn begin_solving(&mut self) -> Result<(), MazeError> {
        let Stage::Generating(carver) = &mut self.stage else {
            return Ok(());
        };
        let maze = carver.finish()?;
        self.generation.stop();
        debug!(
            "generation finished in {:.1}s",
            self.generation.elapsed().as_secs_f64()
        );

        self.stage = first_stage(&mut self.queue, maze);
        match &mut self.stage {
            Stage::Solving(simulation) if self.paused => simulation.pause(),
            Stage::Idle(_) => {
                self.complete = true;
                info!("no solver configured, session complete");
            }
            Stage::Generating(_) | Stage::Solving(_) => {}
        }
        self.settle();

        Ok(())
    }

    /// Collects finished outcomes and starts the next queued solver, until one is still running
    /// or the queue is empty.
    fn settle(&mut self) {
        let Stage::Solving(simulation) = &mut self.stage else {
            return;
        };

        while let Some(outcome) = simulation.outcome().copied() {
            self.outcomes.push(outcome);
            if let Some(kind) = self.queue.pop_front() {
                simulation.switch(kind);
            } else {
                self.complete = true;
                info!("session complete after {} solvers", self.outcomes.len());
                break;
            }
        }
    }
}

/// Hands `maze` to the first queued solver, or parks it when the queue is empty.
fn first_stage(queue: &mut VecDeque<SolverKind>, maze: Maze) -> Stage {
    match queue.pop_front() {
        Some(kind) => Stage::Solving(Simulation::new(maze, kind)),
        None => Stage::Idle(maze),
    }
}

/// Swallows [`MazeError::Stuck`], which the simulation already recorded as an outcome.
fn tolerate_stuck(result: Result<(), MazeError>) -> Result<(), MazeError> {
    match result {
        Err(MazeError::Stuck(position)) => {
            warn!("solver gave up at {position}, moving on");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{Solver as _, Status};

    /// Settings for a small seeded run with both solvers.
    fn settings(rows: usize, cols: usize) -> Settings {
        Settings::new(rows, cols, Some(99)).expect("dimensions are positive")
    }

    #[test]
    fn test_phases_run_in_order() {
        let mut session = Session::new(&settings(4, 5)).expect("settings are valid");
        let mut phases = vec![session.phase()];

        for _ in 0..1_000 {
            if session.is_complete() {
                break;
            }
            session.tick().expect("generated mazes never fail");
            let phase = session.phase();
            if phases.last() != Some(&phase) {
                phases.push(phase);
            }
        }

        assert_eq!(
            phases,
            vec![
                Phase::Generating,
                Phase::Solving(SolverKind::Path),
                Phase::Solving(SolverKind::RightHand),
                Phase::Complete,
            ]
        );
        assert_eq!(session.outcomes().len(), 2);
        assert!(session
            .outcomes()
            .iter()
            .all(|outcome| outcome.status == Status::Solved));
    }

    #[test]
    fn test_skip_phase_finishes_the_active_phase() {
        let mut session = Session::new(&settings(6, 6)).expect("settings are valid");

        session.skip_phase().expect("generated mazes never fail");
        assert_eq!(session.phase(), Phase::Solving(SolverKind::Path));
        assert_eq!(session.grid().passage_count(), 35);
        assert_eq!(session.carver_head(), None);

        session.skip_phase().expect("generated mazes never fail");
        assert_eq!(session.phase(), Phase::Solving(SolverKind::RightHand));
        let simulation = session.simulation().expect("solving has started");
        assert_eq!(simulation.solver().moves(), 0, "the next solver starts fresh");

        session.skip_phase().expect("generated mazes never fail");
        assert!(session.is_complete());
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn test_paused_session_ignores_ticks() {
        let mut session = Session::new(&settings(5, 5)).expect("settings are valid");
        session.toggle_pause();

        for _ in 0..10 {
            session.tick().expect("paused ticks never fail");
        }

        assert!(session.is_paused());
        assert_eq!(session.grid().passage_count(), 0, "nothing is carved while paused");
        assert_eq!(session.carver_head(), Some(session.entrance()));

        session.toggle_pause();
        session.tick().expect("generated mazes never fail");
        assert_eq!(session.grid().passage_count(), 1);
    }

    #[test]
    fn test_run_to_end_summary() {
        let mut session = Session::new(&settings(7, 3)).expect("settings are valid");
        let summary = session.run_to_end().expect("generated mazes never fail");

        assert_eq!((summary.rows, summary.cols, summary.seed), (7, 3, 99));
        assert_eq!(
            summary
                .outcomes
                .iter()
                .map(|outcome| outcome.kind)
                .collect::<Vec<_>>(),
            vec![SolverKind::Path, SolverKind::RightHand]
        );
        assert_eq!(
            summary.outcomes.first().map(|outcome| outcome.route_len),
            summary.outcomes.last().map(|outcome| outcome.route_len),
            "both solvers end on the same unique path"
        );

        let text = summary.to_string();
        assert!(text.starts_with("Generation: 7x3 maze from seed 99"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_single_cell_session_completes_after_generation() {
        let mut session = Session::new(&settings(1, 1)).expect("settings are valid");

        session.tick().expect("a 1x1 maze never fails");

        assert!(session.is_complete());
        assert_eq!(session.outcomes().len(), 2);
        assert_eq!(session.entrance(), session.exit());
    }

    #[test]
    fn test_single_solver_session() {
        let mut settings = settings(3, 3);
        settings.solvers = vec![SolverKind::RightHand];
        let mut session = Session::new(&settings).expect("settings are valid");

        let summary = session.run_to_end().expect("generated mazes never fail");

        assert_eq!(summary.outcomes.len(), 1);
        assert_eq!(
            summary.outcomes.first().map(|outcome| outcome.kind),
            Some(SolverKind::RightHand)
        );
    }

    #[test]
    fn test_stuck_solvers_end_their_phase() {
        let grid = Grid::new(1, 2).expect("1x2 grid should be valid");
        let maze = Maze::from_parts(grid, Position::new(0, 0), Position::new(0, 1))
            .expect("cells are inside the grid");
        let mut session = Session::from_maze(maze, &[SolverKind::Path, SolverKind::RightHand]);
        assert_eq!(session.phase(), Phase::Solving(SolverKind::Path));

        session.tick().expect("stuck solvers are not errors");
        assert_eq!(
            session.phase(),
            Phase::Solving(SolverKind::RightHand),
            "the next solver starts once the first one is stuck"
        );

        session.tick().expect("stuck solvers are not errors");
        assert!(session.is_complete());

        let statuses = session
            .outcomes()
            .iter()
            .map(|outcome| (outcome.kind, outcome.status))
            .collect::<Vec<_>>();
        assert_eq!(
            statuses,
            vec![
                (SolverKind::Path, Status::Stuck),
                (SolverKind::RightHand, Status::Stuck),
            ]
        );

        let text = session.summary().to_string();
        assert!(text.contains("Path solver: stuck"), "summary was {text}");
        assert!(text.contains("Right-hand solver: stuck"), "summary was {text}");
    }

    #[test]
    fn test_from_maze_runs_to_end() {
        let maze = crate::maze::generate(5, 4, Some(8)).expect("dimensions are positive");
        let mut session = Session::from_maze(maze, &[SolverKind::RightHand]);

        let summary = session.run_to_end().expect("generated mazes never fail");

        assert_eq!((summary.rows, summary.cols, summary.seed), (5, 4, 8));
        assert_eq!(summary.generation, Duration::ZERO);
        assert_eq!(
            summary.outcomes.first().map(|outcome| outcome.status),
            Some(Status::Solved)
        );
    }

    #[test]
    fn test_empty_solver_list_completes_after_generation() {
        let mut settings = settings(3, 4);
        settings.solvers.clear();
        let mut session = Session::new(&settings).expect("settings are valid");

        session.skip_phase().expect("generated mazes never fail");

        assert!(session.is_complete());
        assert_eq!(session.phase(), Phase::Complete);
        assert!(session.outcomes().is_empty());
        assert!(session.simulation().is_none());
        assert_eq!(session.grid().passage_count(), 11, "the carved maze is kept");
        assert_eq!(session.seed(), 99);
    }

    #[test]
    fn test_from_maze_without_solvers_is_complete() {
        let maze = crate::maze::generate(2, 2, Some(1)).expect("dimensions are positive");
        let mut session = Session::from_maze(maze, &[]);

        assert!(session.is_complete());
        session.tick().expect("complete sessions never fail");
        assert_eq!(
            session.run_to_end().map(|summary| summary.outcomes.len()),
            Ok(0)
        );
    }

    #[test]
    fn test_tolerate_stuck() {
        assert_eq!(
            tolerate_stuck(Err(MazeError::Stuck(Position::new(1, 1)))),
            Ok(())
        );
        assert_eq!(
            tolerate_stuck(Err(MazeError::OutOfBounds(Position::new(9, 9)))),
            Err(MazeError::OutOfBounds(Position::new(9, 9)))
        );
    }
}
