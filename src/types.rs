//! Type definitions for the screens and the drawing layers of the interface.

use ratatui::style::Color;

use crate::solver::SolverKind;

/// Enumeration of available application screens.
///
/// This is used to determine which screen to render and what actions to take based on user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// The maze being carved and then solved.
    InGame,
    /// Results of the finished session.
    Summary,
}

/// Drawing layers of the maze canvas, from bottom to top.
///
/// Each layer is painted over the previous one, so later layers win where they overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Layer {
    /// Walls and corner posts.
    Walls,
    /// Every cell the active solver has stood on.
    Visited,
    /// The net path from the entrance to the solver.
    Route(SolverKind),
    /// Entrance and exit cells.
    Endpoints,
    /// The cell currently being carved or explored.
    Head,
}

impl Layer {
    /// Returns the color the layer is painted with.
    pub(crate) const fn color(self) -> Color {
        match self {
            Self::Walls => Color::Green,
            Self::Visited => Color::DarkGray,
            Self::Route(SolverKind::Path) => Color::Yellow,
            Self::Route(SolverKind::RightHand) => Color::Blue,
            Self::Endpoints => Color::Cyan,
            Self::Head => Color::Red,
        }
    }
}
