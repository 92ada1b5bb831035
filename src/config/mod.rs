//! Tuning configuration and CLI argument types
//!
//! A tuning file names one of the reference models, optional base
//! hyperparameters, and the ranges to sweep:
//!
//! ```yaml
//! model: knn_regressor
//! base:
//!   metric: manhattan
//! resolution: 5
//! ranges:
//!   - field: k
//!     lower: 1
//!     upper: 100
//!     scale: log10
//!   - field: metric
//!     values: [euclidean, manhattan]
//! ```

mod cli;
mod error;
mod loader;
mod schema;
mod validate;


pub use cli::{parse_args, Cli, Command, DemoArgs, GridArgs, OutputFormat, ValidateArgs};
pub use error::{ConfigError, Result};
pub use loader::{load_spec, parse_spec};
pub use schema::{ModelKind, RangeSpec, TuningSpec};
pub use validate::validate_spec;
