//! Hyperparameter ranges and grid generation
//!
//! # Example
//!
//! ```
//! use entramado::models::KnnRegressor;
//! use entramado::tuning::{make_range, GridSearch, RangeOptions, Scale};
//!
//! let model = KnnRegressor::default();
//! let k = make_range(&model, "k", RangeOptions::bounds(1i64, 100i64).scale(Scale::Log10))?;
//! let metric = make_range(&model, "metric", RangeOptions::values(["euclidean", "manhattan"]))?;
//!
//! let grid = GridSearch::new(vec![k, metric], 3);
//! assert_eq!(grid.rows()?.len(), 6);
//! # Ok::<(), entramado::tuning::TuningError>(())
//! ```

mod error;
mod grid;
mod iterator;
mod params;
mod range;
mod scale;
mod value;

pub use error::{Result, TuningError};
pub use grid::{GridRow, GridSearch};
pub use iterator::{unwind, RangeIter};
pub use params::{resolve_field, set_field, with_params};
pub use range::{
    make_range, scale_of, NominalRange, NumericBounds, NumericRange, ParamRange, RangeOptions,
};
pub use scale::{Scale, ScaleFn, ScaleTag};
pub use value::ParameterValue;
