//! Network error types

use thiserror::Error;

use super::node::{NodeId, TrainableId};
use crate::model::ModelError;

/// Errors raised while building, fitting or calling a network
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("Unknown learning node: {0}")]
    UnknownNode(NodeId),

    #[error("Unknown trainable node: {0}")]
    UnknownTrainable(TrainableId),

    #[error("Learning node {0} is not a source node")]
    NotSource(NodeId),

    #[error("Trainable node {trainable} ({model}) has not been fit")]
    NotFit {
        trainable: TrainableId,
        model: &'static str,
    },

    #[error("Trainable node {trainable} ({model}) failed: {source}")]
    Model {
        trainable: TrainableId,
        model: &'static str,
        #[source]
        source: ModelError,
    },
}

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
