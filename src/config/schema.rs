//! Tuning file schema

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ConfigError, Result};
use crate::models::{ConstantRegressor, KnnRegressor, Standardizer, UnivariateStandardizer};
use crate::tuning::{
    self, make_range, with_params, GridRow, GridSearch, ParamRange, ParameterValue, RangeOptions,
    Scale,
};

/// Reference model a tuning file applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Standardizer,
    UnivariateStandardizer,
    KnnRegressor,
    ConstantRegressor,
}

impl ModelKind {
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Standardizer => "Standardizer",
            ModelKind::UnivariateStandardizer => "UnivariateStandardizer",
            ModelKind::KnnRegressor => "KnnRegressor",
            ModelKind::ConstantRegressor => "ConstantRegressor",
        }
    }

    /// Default configuration with `overrides` applied, as a JSON tree
    pub fn base_config(self, overrides: &[(String, ParameterValue)]) -> tuning::Result<Value> {
        match self {
            ModelKind::Standardizer => configured::<Standardizer>(overrides),
            ModelKind::UnivariateStandardizer => configured::<UnivariateStandardizer>(overrides),
            ModelKind::KnnRegressor => configured::<KnnRegressor>(overrides),
            ModelKind::ConstantRegressor => configured::<ConstantRegressor>(overrides),
        }
    }

    /// Check that applying `row` to `base` yields a valid configuration
    pub fn check_row(self, base: &Value, row: &GridRow) -> tuning::Result<()> {
        let tree = with_params(base, row)?;
        match self {
            ModelKind::Standardizer => decode::<Standardizer>(tree),
            ModelKind::UnivariateStandardizer => decode::<UnivariateStandardizer>(tree),
            ModelKind::KnnRegressor => decode::<KnnRegressor>(tree),
            ModelKind::ConstantRegressor => decode::<ConstantRegressor>(tree),
        }
    }
}

fn configured<C>(overrides: &[(String, ParameterValue)]) -> tuning::Result<Value>
where
    C: Default + Serialize + DeserializeOwned,
{
    Ok(serde_json::to_value(with_params(&C::default(), overrides)?)?)
}

fn decode<C: DeserializeOwned>(tree: Value) -> tuning::Result<()> {
    serde_json::from_value::<C>(tree)?;
    Ok(())
}

fn default_resolution() -> usize {
    10
}

/// One `ranges` entry of a tuning file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// Dotted path of the hyperparameter
    pub field: String,

    /// Candidates for a nominal range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ParameterValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<ParameterValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<ParameterValue>,

    /// `linear`, `log`, `log10` or `log2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,

    /// Grid points for this range, overriding the file default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<usize>,
}

impl RangeSpec {
    pub fn parsed_scale(&self) -> Result<Scale> {
        match &self.scale {
            None => Ok(Scale::Linear),
            Some(name) => name.parse().map_err(|message| ConfigError::InvalidScale {
                field: self.field.clone(),
                message,
            }),
        }
    }

    pub fn options(&self) -> Result<RangeOptions> {
        Ok(RangeOptions {
            values: self.values.clone(),
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            scale: self.parsed_scale()?,
        })
    }
}

/// Complete tuning file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningSpec {
    pub model: ModelKind,

    /// Hyperparameter overrides applied before the sweep
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub base: BTreeMap<String, ParameterValue>,

    /// Default grid points per numeric range
    #[serde(default = "default_resolution")]
    pub resolution: usize,

    pub ranges: Vec<RangeSpec>,
}

impl TuningSpec {
    pub fn base_assignments(&self) -> Vec<(String, ParameterValue)> {
        self.base
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    /// Base configuration of the model, as a JSON tree
    pub fn base_config(&self) -> Result<Value> {
        Ok(self.model.base_config(&self.base_assignments())?)
    }

    /// Ranges resolved against the base configuration
    pub fn param_ranges(&self) -> Result<Vec<ParamRange>> {
        let base = self.base_config()?;
        self.ranges
            .iter()
            .map(|range| -> Result<ParamRange> {
                Ok(make_range(&base, &range.field, range.options()?)?)
            })
            .collect()
    }

    /// Grid search over every range, with per-range resolutions applied
    pub fn grid(&self) -> Result<GridSearch> {
        let grid = GridSearch::new(self.param_ranges()?, self.resolution);
        Ok(self
            .ranges
            .iter()
            .filter_map(|range| range.resolution.map(|n| (range.field.as_str(), n)))
            .fold(grid, |grid, (field, n)| grid.with_resolution(field, n)))
    }
}
