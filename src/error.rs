use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// The terminal can't fit the smallest playable board.
    #[error("console too small: {columns}x{rows}, need at least 39x12")]
    TerminalTooSmall { rows: u16, columns: u16 },

    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),
}

pub type Result<T> = std::result::Result<T, GameError>;
