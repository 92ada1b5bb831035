//! Reference model collaborators
//!
//! Small, deterministic models used to exercise learning networks:
//! - [`Standardizer`] - per-column z-score feature transformer
//! - [`UnivariateStandardizer`] - invertible target transformer
//! - [`KnnRegressor`] - k-nearest-neighbour mean regressor
//! - [`ConstantRegressor`] - target-mean baseline

mod constant;
mod knn;
mod standardizer;

pub use constant::ConstantRegressor;
pub use knn::{DistanceMetric, KnnRegressor};
pub use standardizer::{Standardizer, UnivariateStandardizer};

/// Location and spread of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ColumnStats {
    pub mean: f64,
    pub std: f64,
}

impl ColumnStats {
    /// Sample statistics; constant or single-value columns get unit spread.
    pub(crate) fn of<'a>(values: impl Iterator<Item = &'a f64>) -> Self {
        let values: Vec<f64> = values.copied().collect();
        let n = values.len();
        if n == 0 {
            return Self { mean: 0.0, std: 1.0 };
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        if n < 2 {
            return Self { mean, std: 1.0 };
        }
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std = var.sqrt();
        Self {
            mean,
            std: if std > 0.0 { std } else { 1.0 },
        }
    }
}
