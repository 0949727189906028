use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{GameError, Result};
use crate::GridInt;

pub const MIN_ROWS: u16 = 12;
pub const MIN_COLUMNS: u16 = 39;

/// Slowest speed that is honored; anything below falls back to the default interval.
pub const MIN_MOVES_PER_SECOND: f64 = 0.1;
pub const DEFAULT_MOVE_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Parser)]
#[command(name = "chain-snake")]
#[command(version, about = "Snake with color chains, in the terminal")]
pub struct Cli {
    /// Moves per second (at least 0.1, defaults to 5)
    pub moves_per_second: Option<f64>,

    /// Seed for item placement, for reproducible boards
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a log of game events to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn move_interval(&self) -> Duration {
        move_interval(self.moves_per_second)
    }
}

pub fn move_interval(moves_per_second: Option<f64>) -> Duration {
    match moves_per_second {
        Some(mps) if mps >= MIN_MOVES_PER_SECOND => Duration::from_secs_f64(1.0 / mps),
        _ => DEFAULT_MOVE_INTERVAL,
    }
}

/// Board dimensions in cells, borders included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub width: GridInt,
    pub height: GridInt,
}

impl GridSize {
    /// Every cell is two terminal columns wide, and two rows are kept for the
    /// status bar and the cursor line.
    pub fn from_terminal(rows: u16, columns: u16) -> Result<Self> {
        if rows < MIN_ROWS || columns < MIN_COLUMNS {
            return Err(GameError::TerminalTooSmall { rows, columns });
        }

        Ok(GridSize {
            width: (columns - 1) / 2,
            height: rows - 2,
        })
    }

    /// Cells a snake can ever occupy.
    pub fn playable_area(&self) -> u64 {
        (self.width as u64 - 2) * (self.height as u64 - 2)
    }
}
