//! Dotted field paths into serialized configurations
//!
//! Configurations are addressed through their `serde_json` representation,
//! so `"learner.k"` reaches field `k` of the nested `learner` struct.
//! Numeric segments index into sequences.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::{Result, TuningError};
use super::value::ParameterValue;

/// Resolve `path` inside a serialized configuration
pub fn resolve_field<'a>(root: &'a Value, path: &str) -> Result<&'a Value> {
    let mut current = root;
    for segment in segments(path)? {
        current = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
        .ok_or_else(|| missing(path))?;
    }
    Ok(current)
}

/// Overwrite the value at an existing `path`
pub fn set_field(root: &mut Value, path: &str, value: Value) -> Result<()> {
    let mut current = root;
    for segment in segments(path)? {
        let node = current;
        current = match node {
            Value::Object(map) => map.get_mut(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(move |i| items.get_mut(i)),
            _ => None,
        }
        .ok_or_else(|| missing(path))?;
    }
    *current = value;
    Ok(())
}

/// Build a copy of `config` with each `(field, value)` assignment applied.
///
/// The original configuration is left untouched.
pub fn with_params<C>(config: &C, assignments: &[(String, ParameterValue)]) -> Result<C>
where
    C: Serialize + DeserializeOwned,
{
    let mut tree = serde_json::to_value(config)?;
    for (field, value) in assignments {
        set_field(&mut tree, field, value.to_json())?;
    }
    Ok(serde_json::from_value(tree)?)
}

fn segments(path: &str) -> Result<std::str::Split<'_, char>> {
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(TuningError::Configuration(format!(
            "invalid field path `{path}`"
        )));
    }
    Ok(path.split('.'))
}

fn missing(path: &str) -> TuningError {
    TuningError::Configuration(format!("configuration has no field `{path}`"))
}
