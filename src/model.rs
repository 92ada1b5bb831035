//! Model contract consumed by learning networks
//!
//! A [`Model`] is a hyperparameter configuration that knows how to train
//! itself on a tuple of [`Data`] arguments. Training yields a [`Fitted`]
//! value holding the learned parameters, which networks apply lazily via
//! `transform`, `inverse_transform` or `predict`.
//!
//! Configurations are shared between the caller and the network through
//! [`Shared`] handles: mutating the configuration through the handle is how
//! a caller requests retraining.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::data::Data;

/// Shared, mutable handle to a model configuration
pub type Shared<M> = Rc<RefCell<M>>;

/// Type-erased shared configuration as stored by a network
pub type SharedModel = Rc<RefCell<dyn Model>>;

/// Free-form metadata produced by a fit
pub type Report = serde_json::Map<String, Value>;

/// Wrap a configuration in a [`Shared`] handle
pub fn shared<M>(model: M) -> Shared<M> {
    Rc::new(RefCell::new(model))
}

/// Errors raised by model collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("expected {expected} training argument(s), got {got}")]
    Arity { expected: usize, got: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Value snapshot of a configuration's hyperparameters.
///
/// Implemented for every `Serialize` type; snapshots are compared by value
/// to decide whether a configuration changed between two fits.
pub trait Hyperparameters {
    fn snapshot(&self) -> serde_json::Result<Value>;
}

impl<T: Serialize> Hyperparameters for T {
    fn snapshot(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Learned parameters produced by [`Model::fit`]
pub trait Fitted: fmt::Debug {
    fn transform(&self, _data: &Data) -> Result<Data, ModelError> {
        Err(ModelError::Unsupported("transform"))
    }

    fn inverse_transform(&self, _data: &Data) -> Result<Data, ModelError> {
        Err(ModelError::Unsupported("inverse_transform"))
    }

    fn predict(&self, _data: &Data) -> Result<Data, ModelError> {
        Err(ModelError::Unsupported("predict"))
    }
}

/// Result of training a model
#[derive(Debug)]
pub struct FitOutcome {
    pub fitted: Box<dyn Fitted>,
    pub report: Report,
}

impl FitOutcome {
    pub fn new(fitted: impl Fitted + 'static) -> Self {
        Self {
            fitted: Box::new(fitted),
            report: Report::new(),
        }
    }

    /// Attach a report entry
    pub fn with_report(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.report.insert(key.to_string(), value.into());
        self
    }
}

/// Trainable model configuration
pub trait Model: Hyperparameters + fmt::Debug {
    /// Display name used in logs and errors
    fn name(&self) -> &'static str;

    /// Train on `args` (features first, then targets for supervised models).
    ///
    /// `verbosity` only affects logging.
    fn fit(&self, verbosity: i32, args: &[Data]) -> Result<FitOutcome, ModelError>;
}

/// Check the number of training arguments
pub fn check_arity(args: &[Data], expected: usize) -> Result<(), ModelError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ModelError::Arity {
            expected,
            got: args.len(),
        })
    }
}
