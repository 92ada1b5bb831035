//! Baseline regressor predicting a single value

use serde::{Deserialize, Serialize};

use crate::data::Data;
use crate::model::{check_arity, FitOutcome, Fitted, Model, ModelError};

/// Predict the training target mean, optionally shrunk towards zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantRegressor {
    /// Multiplier applied to the target mean
    pub shrinkage: f64,
}

impl Default for ConstantRegressor {
    fn default() -> Self {
        Self { shrinkage: 1.0 }
    }
}

#[derive(Debug, Clone, Copy)]
struct ConstantFit {
    value: f64,
}

impl Fitted for ConstantFit {
    fn predict(&self, data: &Data) -> Result<Data, ModelError> {
        Ok(Data::from_slice(&vec![self.value; data.nrows()]))
    }
}

impl Model for ConstantRegressor {
    fn name(&self) -> &'static str {
        "ConstantRegressor"
    }

    fn fit(&self, _verbosity: i32, args: &[Data]) -> Result<FitOutcome, ModelError> {
        check_arity(args, 2)?;
        let y = args[1].as_vector().ok_or_else(|| {
            ModelError::InvalidInput(format!(
                "ConstantRegressor expects vector targets, got {}",
                args[1].kind()
            ))
        })?;
        if y.is_empty() {
            return Err(ModelError::InvalidInput("no training targets".to_string()));
        }
        let value = self.shrinkage * y.sum() / y.len() as f64;
        Ok(FitOutcome::new(ConstantFit { value }).with_report("value", value))
    }
}
