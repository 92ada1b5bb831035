//! Grid search over several parameter ranges

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::error::Result;
use super::iterator::{grid_size, unwind};
use super::params::with_params;
use super::range::ParamRange;
use super::value::ParameterValue;

/// One grid point: `(field, value)` per range, in range order
pub type GridRow = Vec<(String, ParameterValue)>;

/// Grid search generator
#[derive(Debug, Clone)]
pub struct GridSearch {
    ranges: Vec<ParamRange>,
    /// Grid points per numeric range
    pub(crate) resolution: usize,
    overrides: HashMap<String, usize>,
}

impl GridSearch {
    /// Create new grid search
    pub fn new(ranges: Vec<ParamRange>, resolution: usize) -> Self {
        Self {
            ranges,
            resolution,
            overrides: HashMap::new(),
        }
    }

    /// Use `n` points for the range on `field` instead of the default.
    ///
    /// A field with no range is logged and dropped.
    pub fn with_resolution(mut self, field: &str, n: usize) -> Self {
        if self.ranges.iter().any(|range| range.field() == field) {
            self.overrides.insert(field.to_string(), n);
        } else {
            warn!(field, resolution = n, "no range on field; resolution ignored");
        }
        self
    }

    pub fn ranges(&self) -> &[ParamRange] {
        &self.ranges
    }

    /// Resolution applied to the range on `field`
    pub fn resolution_for(&self, field: &str) -> usize {
        self.overrides.get(field).copied().unwrap_or(self.resolution)
    }

    /// Candidate sequence of every range, in range order
    pub fn columns(&self) -> Result<Vec<Vec<ParameterValue>>> {
        self.ranges
            .iter()
            .map(|range| Ok(range.iterator(self.resolution_for(range.field()))?.collect()))
            .collect()
    }

    /// Number of grid rows
    pub fn len(&self) -> Result<usize> {
        grid_size(self.columns()?.iter().map(Vec::len))
    }

    /// Generate all grid configurations; the first range varies fastest
    pub fn rows(&self) -> Result<Vec<GridRow>> {
        let columns = self.columns()?;
        let rows = unwind(&columns)?;
        Ok(rows
            .into_iter()
            .map(|row| {
                self.ranges
                    .iter()
                    .map(|range| range.field().to_string())
                    .zip(row)
                    .collect()
            })
            .collect())
    }

    /// One copy of `config` per grid row with that row's values applied
    pub fn candidates<C>(&self, config: &C) -> Result<Vec<C>>
    where
        C: Serialize + DeserializeOwned,
    {
        self.rows()?
            .iter()
            .map(|row| with_params(config, row))
            .collect()
    }
}
