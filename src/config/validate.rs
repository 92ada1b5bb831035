//! Tuning file validation

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use super::error::{ConfigError, Result};
use super::schema::TuningSpec;
use crate::tuning::{GridRow, GridSearch};

/// Check a tuning file for structural and semantic errors.
///
/// Beyond the schema rules (at least one range, resolutions >= 1, no field
/// swept twice) every range is resolved against the model's base
/// configuration and every candidate value is checked to decode into a
/// valid configuration. Ranges sweep distinct fields, so candidates are
/// checked one field at a time and the grid rows are never built.
pub fn validate_spec(spec: &TuningSpec) -> Result<()> {
    if spec.ranges.is_empty() {
        return Err(ConfigError::NoRanges);
    }
    if spec.resolution == 0 {
        return Err(ConfigError::InvalidResolution {
            field: "<default>".to_string(),
            value: 0,
        });
    }

    let mut seen = HashSet::new();
    for range in &spec.ranges {
        if !seen.insert(range.field.as_str()) {
            return Err(ConfigError::DuplicateField(range.field.clone()));
        }
        if range.resolution == Some(0) {
            return Err(ConfigError::InvalidResolution {
                field: range.field.clone(),
                value: 0,
            });
        }
        range.parsed_scale()?;
    }

    let base = spec.base_config()?;
    let grid = spec.grid()?;
    let checked = check_candidates(spec, &base, &grid)?;
    let rows = grid.len()?;
    debug!(
        model = spec.model.name(),
        candidates = checked,
        rows,
        "tuning file valid"
    );
    Ok(())
}

/// Decode each range's candidates on top of `base`; returns how many were
/// checked
pub(super) fn check_candidates(
    spec: &TuningSpec,
    base: &Value,
    grid: &GridSearch,
) -> Result<usize> {
    let mut checked = 0;
    for (range, column) in grid.ranges().iter().zip(grid.columns()?) {
        for value in column {
            let row: GridRow = vec![(range.field().to_string(), value)];
            spec.model.check_row(base, &row)?;
            checked += 1;
        }
    }
    Ok(checked)
}
