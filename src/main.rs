//! This crate contains the source code for the binary of the maze animator.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use mazebot::{
    config::{Args, Settings},
    logging,
    session::Session,
    App,
};

fn main() -> Result<()> {
    install()?;

    let settings = Settings::try_from(Args::parse())?;
    logging::init(&settings)?;

    if settings.headless {
        let summary = Session::new(&settings)?.run_to_end()?;
        println!("{summary}");
        return Ok(());
    }

    let mut app = App::new(settings)?;
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}
