//! Entramado: learning networks with selective retraining
//!
//! Models are composed into a lazily evaluated graph ([`network`]) whose
//! trainable nodes can be fit through from any output, frozen, and thawed.
//! [`composite`] turns such a graph into a single model with a
//! `fit` / `update` / `predict` lifecycle that retrains only what changed.
//! [`tuning`] generates hyperparameter ranges and grids over any
//! serializable configuration.
//!
//! # Modules
//!
//! - [`data`]: table and vector containers
//! - [`model`]: the model contract consumed by networks
//! - [`models`]: small reference models
//! - [`network`]: learning network arena
//! - [`composite`]: composite model adapter
//! - [`tuning`]: ranges, scales and grid search
//! - [`config`]: YAML tuning files and CLI arguments
//! - [`cli`]: command handlers

pub mod cli;
pub mod composite;
pub mod config;
pub mod data;
pub mod model;
pub mod models;
pub mod network;
pub mod tuning;

#[cfg(test)]
mod test_logs;

pub use composite::{CompositeModel, TransformedTargetPipeline};
pub use data::Data;
pub use model::{shared, FitOutcome, Fitted, Model, ModelError, Shared, SharedModel};
pub use network::{Network, NodeId, TrainableId};
pub use tuning::{make_range, GridSearch, ParamRange, RangeOptions, Scale};
