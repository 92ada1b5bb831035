//! Configuration error types

use thiserror::Error;

use crate::tuning::TuningError;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse YAML config: {0}")]
    Parse(String),

    #[error("Tuning file must declare at least one range")]
    NoRanges,

    #[error("Invalid resolution for `{field}`: {value} (must be >= 1)")]
    InvalidResolution { field: String, value: usize },

    #[error("Duplicate range for field `{0}`")]
    DuplicateField(String),

    #[error("Invalid scale for `{field}`: {message}")]
    InvalidScale { field: String, message: String },

    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
