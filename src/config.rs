//! Command-line configuration.
//!
//! [`Args`] is what clap parses; [`Settings`] is the validated form the rest of the crate uses.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};

use crate::{error::MazeError, grid::checked_cell_count, solver::SolverKind};

/// Which solvers a run animates, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SolverChoice {
    /// Only the depth-first path solver.
    Path,
    /// Only the right-hand wall follower.
    RightHand,
    /// The path solver, then the right-hand wall follower.
    Both,
}

impl SolverChoice {
    /// Solvers to run, in order. Never empty.
    #[must_use]
    pub fn kinds(self) -> Vec<SolverKind> {
        match self {
            Self::Path => vec![SolverKind::Path],
            Self::RightHand => vec![SolverKind::RightHand],
            Self::Both => vec![SolverKind::Path, SolverKind::RightHand],
        }
    }
}

/// Generate a maze and watch it being solved.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Number of maze rows.
    #[arg(short, long, default_value_t = 15)]
    pub rows: usize,
    /// Number of maze columns.
    #[arg(short, long, default_value_t = 25)]
    pub cols: usize,
    /// Seed for the maze generator; a random one is used when omitted.
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Solvers to animate after generation.
    #[arg(long, value_enum, default_value_t = SolverChoice::Both)]
    pub solver: SolverChoice,
    /// Milliseconds between animation steps.
    #[arg(long, default_value_t = 50)]
    pub tick_ms: u64,
    /// Run every phase to completion without a terminal UI and print the summary.
    #[arg(long)]
    pub headless: bool,
    /// Write logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Validated run configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Number of maze rows, at least 1.
    pub rows: usize,
    /// Number of maze columns, at least 1.
    pub cols: usize,
    /// Generator seed, random when `None`.
    pub seed: Option<u64>,
    /// Solvers to run in order, never empty.
    pub solvers: Vec<SolverKind>,
    /// Delay between animation steps.
    pub tick: Duration,
    /// Whether to skip the terminal UI.
    pub headless: bool,
    /// Log destination, if any.
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Settings for a `rows` x `cols` maze with every other option at its default.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimension`] when `rows` or `cols` is zero or the grid would be
    /// too large to address.
    pub fn new(rows: usize, cols: usize, seed: Option<u64>) -> Result<Self, MazeError> {
        let _ = checked_cell_count(rows, cols)?;

        Ok(Self {
            rows,
            cols,
            seed,
            solvers: SolverChoice::Both.kinds(),
            tick: Duration::from_millis(50),
            headless: false,
            log_file: None,
        })
    }
}

impl TryFrom<Args> for Settings {
    type Error = MazeError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        Ok(Self {
            solvers: args.solver.kinds(),
            tick: Duration::from_millis(args.tick_ms),
            headless: args.headless,
            log_file: args.log_file,
            ..Self::new(args.rows, args.cols, args.seed)?
        })
    }
}
