//! Tuning error types

use thiserror::Error;

/// Errors raised while building ranges and grids
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot unwind: iterator {index} is empty")]
    EmptyIterator { index: usize },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Invalid resolution: {0} (must be >= 1)")]
    InvalidResolution(usize),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Serialization(err.to_string())
    }
}

/// Result type for tuning operations
pub type Result<T> = std::result::Result<T, TuningError>;
