//! Error kinds reported by the maze core.

#![expect(
    clippy::module_name_repetitions,
    reason = "The error type is re-exported at the crate root where the prefix disambiguates it."
)]

use thiserror::Error;

use crate::grid::Position;

/// Failures of the maze core.
///
/// These are deterministic logic errors rather than transient failures, so none of them is worth
/// retrying. The presentation layer decides how to surface them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MazeError {
    /// A grid was requested with zero rows or zero columns.
    #[error("maze dimensions must be positive, got {rows}x{cols}")]
    InvalidDimension {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        cols: usize,
    },
    /// A wall was opened between two cells that do not share a boundary.
    #[error("cells {first} and {second} are not adjacent")]
    NotAdjacent {
        /// First cell of the attempted passage.
        first: Position,
        /// Second cell of the attempted passage.
        second: Position,
    },
    /// A coordinate lies outside the grid.
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(Position),
    /// A solver ran out of moves before reaching the exit.
    #[error("solver stuck at {0} with no way to the exit")]
    Stuck(Position),
}
