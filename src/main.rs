use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chain_snake::config::{Cli, GridSize};
use chain_snake::game::GameLoop;
use chain_snake::grade::{FinalStats, Report};
use chain_snake::input;
use chain_snake::state::GameState;
use chain_snake::term::TermManager;

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let (rows, columns) = TermManager::size().context("Failed to read terminal size")?;
    let size = GridSize::from_terminal(rows, columns)?;

    let state = match cli.seed {
        Some(seed) => GameState::with_seed(size, seed),
        None => GameState::new(size),
    };

    let mut term = TermManager::new();
    term.setup().context("Failed to set up terminal")?;

    let (sender, receiver) = input::channel();
    let reader = input::spawn_reader(sender);
    let game = GameLoop::new(state, receiver, term, cli.move_interval(), Instant::now());
    let (state, mut term) = match game.run() {
        Ok(done) => done,
        Err(err) => {
            let _ = TermManager::new().restore();
            let _ = reader.join();
            return Err(anyhow::Error::from(err).context("Game aborted"));
        }
    };

    // The reader returns on the next key press, or right away after a quit
    let _ = reader.join();
    term.restore().context("Failed to restore terminal")?;

    println!("{}", Report(FinalStats::of(&state)));
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
