//! Tuning file loading

use std::fs;
use std::path::Path;

use tracing::debug;

use super::error::{ConfigError, Result};
use super::schema::TuningSpec;
use super::validate::validate_spec;

/// Load and validate a tuning file
///
/// # Example
///
/// ```no_run
/// use entramado::config::load_spec;
///
/// let spec = load_spec("tuning.yaml")?;
/// let grid = spec.grid()?;
/// println!("{} candidates", grid.len()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<TuningSpec> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), bytes = yaml.len(), "read tuning file");
    parse_spec(&yaml)
}

/// Parse and validate a tuning file from a YAML string
pub fn parse_spec(yaml: &str) -> Result<TuningSpec> {
    let spec: TuningSpec =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_spec(&spec)?;
    Ok(spec)
}
