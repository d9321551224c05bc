//! Maze generation and animated solving in the terminal.
//!
//! The core generates perfect mazes by randomized depth-first carving and solves them step by step
//! with either a depth-first path solver or a right-hand wall follower. A [`session::Session`]
//! sequences the phases of a run, and [`App`] animates a session with Ratatui.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

pub mod config;
pub mod error;
pub mod grid;
pub mod logging;
pub mod maze;
pub mod session;
pub mod simulation;
pub mod solver;
pub mod timer;

mod app;
mod canvas;
mod events;
mod types;
mod ui;

pub use app::App;
pub use error::MazeError;
pub use maze::{generate, Maze};
