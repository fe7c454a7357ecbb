use std::io;

use thiserror::Error;

use crate::Coords;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("terminal too small: need at least {}x{}, have {}x{}", .need.0, .need.1, .have.0, .have.1)]
    TerminalTooSmall { need: Coords, have: Coords },
}

pub type Result<T> = std::result::Result<T, GameError>;
