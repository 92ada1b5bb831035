//! Error types for composite models

use thiserror::Error;

use crate::network::NetworkError;

/// Errors raised while fitting, updating or predicting with a composite
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositeError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Failed to snapshot hyperparameters: {0}")]
    Snapshot(String),

    #[error("Component mismatch: expected {expected} trainable nodes, got {got}")]
    ComponentMismatch { expected: usize, got: usize },
}

impl From<serde_json::Error> for CompositeError {
    fn from(err: serde_json::Error) -> Self {
        CompositeError::Snapshot(err.to_string())
    }
}

/// Result type for composite operations
pub type Result<T> = std::result::Result<T, CompositeError>;
