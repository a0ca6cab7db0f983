use thiserror::Error;

use crate::entities::GameState;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("storage I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("storage file is not a valid JSON object: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("stored highscore {0:?} is not a non-negative integer")]
    InvalidHighscore(String),
    #[error("cannot go from {from:?} to {to:?}")]
    InvalidTransition { from: GameState, to: GameState },
    #[error("audio error: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
