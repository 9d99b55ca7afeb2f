use thiserror::Error;

use crate::DayPhase;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Market data error: {0}")]
    Feed(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Day cycle out of sequence: expected {expected}, got {found}")]
    OutOfSequence { expected: DayPhase, found: DayPhase },

    #[error("{0}")]
    Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
