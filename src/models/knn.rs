//! Deterministic k-nearest-neighbour regression

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::data::Data;
use crate::model::{check_arity, FitOutcome, Fitted, Model, ModelError};

/// Distance used to rank neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    Euclidean,
    Manhattan,
}

impl DistanceMetric {
    fn distance(self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum(),
        }
    }
}

/// Predict the mean target of the `k` closest training rows.
///
/// Ties in distance are broken by training row order, so predictions are
/// fully deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnnRegressor {
    pub k: usize,
    pub metric: DistanceMetric,
}

impl Default for KnnRegressor {
    fn default() -> Self {
        Self {
            k: 5,
            metric: DistanceMetric::Euclidean,
        }
    }
}

#[derive(Debug, Clone)]
struct KnnFit {
    x: Array2<f64>,
    y: Array1<f64>,
    k: usize,
    metric: DistanceMetric,
}

impl KnnFit {
    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut ranked: Vec<(f64, usize)> = self
            .x
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, train)| (self.metric.distance(row, train), i))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let k = self.k.min(ranked.len());
        ranked[..k].iter().map(|&(_, i)| self.y[i]).sum::<f64>() / k as f64
    }
}

impl Fitted for KnnFit {
    fn predict(&self, data: &Data) -> Result<Data, ModelError> {
        let table = data.as_table().ok_or_else(|| {
            ModelError::InvalidInput(format!("KnnRegressor expects a table, got {}", data.kind()))
        })?;
        if table.ncols() != self.x.ncols() {
            return Err(ModelError::InvalidInput(format!(
                "KnnRegressor fit on {} features, got {}",
                self.x.ncols(),
                table.ncols()
            )));
        }
        let predictions: Array1<f64> = table.rows().into_iter().map(|r| self.predict_row(r)).collect();
        Ok(Data::Vector(predictions))
    }
}

impl Model for KnnRegressor {
    fn name(&self) -> &'static str {
        "KnnRegressor"
    }

    fn fit(&self, _verbosity: i32, args: &[Data]) -> Result<FitOutcome, ModelError> {
        check_arity(args, 2)?;
        if self.k == 0 {
            return Err(ModelError::InvalidInput("k must be at least 1".to_string()));
        }
        let (Some(x), Some(y)) = (args[0].as_table(), args[1].as_vector()) else {
            return Err(ModelError::InvalidInput(format!(
                "KnnRegressor expects (table, vector), got ({}, {})",
                args[0].kind(),
                args[1].kind()
            )));
        };
        if x.nrows() != y.len() {
            return Err(ModelError::InvalidInput(format!(
                "{} feature rows but {} targets",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(ModelError::InvalidInput("no training rows".to_string()));
        }
        let n_train = x.nrows();
        let fit = KnnFit {
            x: x.clone(),
            y: y.clone(),
            k: self.k,
            metric: self.metric,
        };
        Ok(FitOutcome::new(fit)
            .with_report("n_train", n_train)
            .with_report("k", self.k))
    }
}
