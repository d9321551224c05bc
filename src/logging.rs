//! Logger setup.
//!
//! The terminal UI owns stdout and stderr while it runs, so logs only go to a file there. In
//! headless mode they go to stderr. `RUST_LOG` overrides the default `info` filter either way.

use std::fs::File;

use color_eyre::eyre::{Result, WrapErr as _};
use env_logger::{Builder, Env, Target};

use crate::config::Settings;

/// Installs the global logger according to `settings`.
///
/// Without a log file and outside headless mode no logger is installed, which turns every log
/// macro into a no-op.
///
/// # Errors
///
/// - The log file cannot be created.
/// - A global logger was already installed.
pub fn init(settings: &Settings) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    if let Some(path) = &settings.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
        let _ = builder.target(Target::Pipe(Box::new(file)));
    } else if settings.headless {
        let _ = builder.target(Target::Stderr);
    } else {
        return Ok(());
    }

    builder.try_init().wrap_err("failed to install the logger")
}
