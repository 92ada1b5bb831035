//! Standardizing transformers

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::ColumnStats;
use crate::data::Data;
use crate::model::{check_arity, FitOutcome, Fitted, Model, ModelError};

/// Rescale every feature column to zero mean and unit variance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Standardizer {
    /// Subtract the column mean
    pub center: bool,
    /// Divide by the column standard deviation
    pub scale: bool,
}

impl Default for Standardizer {
    fn default() -> Self {
        Self {
            center: true,
            scale: true,
        }
    }
}

#[derive(Debug, Clone)]
struct StandardizerFit {
    stats: Vec<ColumnStats>,
    center: bool,
    scale: bool,
}

impl StandardizerFit {
    fn table<'a>(&self, data: &'a Data) -> Result<&'a Array2<f64>, ModelError> {
        let table = data.as_table().ok_or_else(|| {
            ModelError::InvalidInput(format!("Standardizer expects a table, got {}", data.kind()))
        })?;
        if table.ncols() != self.stats.len() {
            return Err(ModelError::InvalidInput(format!(
                "Standardizer fit on {} columns, got {}",
                self.stats.len(),
                table.ncols()
            )));
        }
        Ok(table)
    }
}

impl Fitted for StandardizerFit {
    fn transform(&self, data: &Data) -> Result<Data, ModelError> {
        let mut out = self.table(data)?.clone();
        for (mut column, stats) in out.axis_iter_mut(Axis(1)).zip(&self.stats) {
            let shift = if self.center { stats.mean } else { 0.0 };
            let factor = if self.scale { stats.std } else { 1.0 };
            column.mapv_inplace(|v| (v - shift) / factor);
        }
        Ok(Data::Table(out))
    }

    fn inverse_transform(&self, data: &Data) -> Result<Data, ModelError> {
        let mut out = self.table(data)?.clone();
        for (mut column, stats) in out.axis_iter_mut(Axis(1)).zip(&self.stats) {
            let shift = if self.center { stats.mean } else { 0.0 };
            let factor = if self.scale { stats.std } else { 1.0 };
            column.mapv_inplace(|v| v * factor + shift);
        }
        Ok(Data::Table(out))
    }
}

impl Model for Standardizer {
    fn name(&self) -> &'static str {
        "Standardizer"
    }

    fn fit(&self, _verbosity: i32, args: &[Data]) -> Result<FitOutcome, ModelError> {
        check_arity(args, 1)?;
        let table = args[0].as_table().ok_or_else(|| {
            ModelError::InvalidInput(format!(
                "Standardizer expects a table, got {}",
                args[0].kind()
            ))
        })?;
        let stats: Vec<ColumnStats> = table
            .axis_iter(Axis(1))
            .map(|column| ColumnStats::of(column.iter()))
            .collect();
        let features = stats.len();
        let fit = StandardizerFit {
            stats,
            center: self.center,
            scale: self.scale,
        };
        Ok(FitOutcome::new(fit).with_report("features", features))
    }
}

/// Standardize a single target column; invertible so predictions can be
/// mapped back to the original units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnivariateStandardizer {
    pub center: bool,
    pub scale: bool,
}

impl Default for UnivariateStandardizer {
    fn default() -> Self {
        Self {
            center: true,
            scale: true,
        }
    }
}

#[derive(Debug, Clone)]
struct UnivariateFit {
    shift: f64,
    factor: f64,
}

impl UnivariateFit {
    fn vector<'a>(data: &'a Data) -> Result<&'a Array1<f64>, ModelError> {
        data.as_vector().ok_or_else(|| {
            ModelError::InvalidInput(format!(
                "UnivariateStandardizer expects a vector, got {}",
                data.kind()
            ))
        })
    }
}

impl Fitted for UnivariateFit {
    fn transform(&self, data: &Data) -> Result<Data, ModelError> {
        let v = Self::vector(data)?;
        Ok(Data::Vector(v.mapv(|x| (x - self.shift) / self.factor)))
    }

    fn inverse_transform(&self, data: &Data) -> Result<Data, ModelError> {
        let v = Self::vector(data)?;
        Ok(Data::Vector(v.mapv(|x| x * self.factor + self.shift)))
    }
}

impl Model for UnivariateStandardizer {
    fn name(&self) -> &'static str {
        "UnivariateStandardizer"
    }

    fn fit(&self, _verbosity: i32, args: &[Data]) -> Result<FitOutcome, ModelError> {
        check_arity(args, 1)?;
        let stats = ColumnStats::of(UnivariateFit::vector(&args[0])?.iter());
        let fit = UnivariateFit {
            shift: if self.center { stats.mean } else { 0.0 },
            factor: if self.scale { stats.std } else { 1.0 },
        };
        Ok(FitOutcome::new(fit)
            .with_report("mean", stats.mean)
            .with_report("std", stats.std))
    }
}
