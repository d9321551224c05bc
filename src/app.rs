//! Core application state and main loop of the terminal front end.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use log::info;
use ratatui::DefaultTerminal;

use crate::{config::Settings, error::MazeError, events, session::Session, types::Screen, ui};

/// Longest time the main loop blocks on input before redrawing.
const MAX_POLL: Duration = Duration::from_millis(100);

/// Application state container for the terminal front end.
///
/// This structure holds the state from which Ratatui renders the interface and which Crossterm
/// events update.
#[derive(Debug)]
pub struct App {
    /// Application exit flag.
    ///
    /// Set to `true` when the user wants to quit; the main loop then returns.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// The run being animated.
    pub(crate) session: Session,
    /// Configuration the session was started with.
    pub(crate) settings: Settings,
    /// When the session was last advanced.
    pub(crate) last_tick: Instant,
}

impl App {
    /// Creates the application with a fresh session built from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimension`] when the settings ask for an empty grid.
    pub fn new(settings: Settings) -> Result<Self, MazeError> {
        Ok(Self {
            exit: false,
            screen: Screen::InGame,
            session: Session::new(&settings)?,
            settings,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main loop of the application.
    ///
    /// This function draws the current screen, handles user input and advances the animation. The
    /// loop continues until the exit condition is `true`, after which the function returns to the
    /// call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    /// - [`MazeError`] when the session fails, which would mean the maze core is broken.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal
                .try_draw(|frame| ui::draw(self, frame).map_err(std::io::Error::other))?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// How long to wait for input before the next tick is due.
    pub(crate) fn poll_timeout(&self) -> Duration {
        self.settings
            .tick
            .saturating_sub(self.last_tick.elapsed())
            .min(MAX_POLL)
    }

    /// Advances the session by one step when its tick is due.
    ///
    /// Nothing moves on the summary screen or while the session is paused. The summary screen is
    /// shown as soon as the session completes.
    ///
    /// # Errors
    ///
    /// This function may return errors from the session.
    pub(crate) fn advance(&mut self) -> Result<(), MazeError> {
        if self.screen != Screen::InGame {
            return Ok(());
        }

        if !self.session.is_paused() && self.last_tick.elapsed() >= self.settings.tick {
            self.last_tick = Instant::now();
            self.session.tick()?;
        }

        if self.session.is_complete() {
            self.screen = Screen::Summary;
        }

        Ok(())
    }

    /// Discards the current session and starts carving a new maze from a random seed.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimension`] when the settings ask for an empty grid.
    pub(crate) fn restart(&mut self) -> Result<(), MazeError> {
        let settings = Settings {
            seed: None,
            ..self.settings.clone()
        };
        self.session = Session::new(&settings)?;
        self.screen = Screen::InGame;
        self.last_tick = Instant::now();
        info!("restarted with seed {}", self.session.seed());

        Ok(())
    }
}
