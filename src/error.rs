use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("board must be at least {min}x{min} cells, got {width}x{height}")]
    BoardTooSmall { width: i32, height: i32, min: i32 },

    #[error("base speed must be a positive number of milliseconds")]
    ZeroSpeed,

    #[error("terminal is {cols}x{rows}, the game needs at least {need_cols}x{need_rows}")]
    TerminalTooSmall { cols: u16, rows: u16, need_cols: u16, need_rows: u16 },

    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error(transparent)]
    Io(#[from] io::Error),
}
