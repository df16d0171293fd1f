mod config;
mod error;
mod food;
mod game;
mod grid;
mod input;
mod menu;
mod render;
mod snake;
mod term;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use log::info;

use crate::config::GameConfig;
use crate::game::{Ending, Session};
use crate::term::TermManager;

#[cfg(feature = "debug")]
const LOG_PATH: &str = "/tmp/console-snake.log";

fn main() -> Result<()> {
    #[cfg(feature = "debug")] init_logging()?;

    let mut term = TermManager::new();
    term.setup().context("failed to prepare the terminal")?;

    // Restore before reporting anything, or the error lands on the alt screen.
    let result = play(&mut term);
    term.restore().context("failed to restore the terminal")?;
    result
}

fn play(term: &mut TermManager) -> Result<()> {
    loop {
        let difficulty = match menu::choose_difficulty(term)? {
            Some(difficulty) => difficulty,
            None => return Ok(()),
        };

        let config = GameConfig::for_difficulty(difficulty).with_env_overrides();
        term.ensure_fits(config.width, config.height)?;

        info!("starting {} game", difficulty);
        let session = Session::new(&config).context("invalid game configuration")?;
        let outcome = session.run(term)?;
        info!("game ended ({:?}) with score {}", outcome.ending, outcome.score);

        if outcome.ending == Ending::Quit {
            return Ok(());
        }
    }
}

#[cfg(feature = "debug")]
fn init_logging() -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {} {} {}",
                chrono::Local::now().format("%H:%M:%S%.6f"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(
            std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(LOG_PATH)
                .context("opening log file failed")?,
        )
        .apply()
        .context("logging initialization failed")?;

    info!("logging to {}", LOG_PATH);
    Ok(())
}
