//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, TuningSpec, ValidateArgs};
use crate::tuning::{scale_of, ParamRange};

/// Describe one resolved range
pub fn format_range(range: &ParamRange, resolution: usize) -> String {
    match range {
        ParamRange::Nominal(r) => {
            let values: Vec<String> = r.values().iter().map(ToString::to_string).collect();
            format!("  {}: nominal [{}]", r.field(), values.join(", "))
        }
        ParamRange::Numeric(r) => {
            let (lower, upper) = r.bounds().as_f64();
            let kind = if r.bounds().is_integer() { "integer" } else { "real" };
            format!(
                "  {}: {kind} [{lower}, {upper}] scale={} points={resolution}",
                r.field(),
                scale_of(range)
            )
        }
    }
}

/// Detailed report of a validated tuning file
pub fn format_details(spec: &TuningSpec) -> Result<String, String> {
    let grid = spec.grid().map_err(|e| e.to_string())?;
    let mut lines = vec![format!("  Model: {}", spec.model.name())];
    if !spec.base.is_empty() {
        let base: Vec<String> = spec.base.iter().map(|(k, v)| format!("{k}={v}")).collect();
        lines.push(format!("  Base: {}", base.join(" ")));
    }
    lines.push("  Ranges:".to_string());
    for range in grid.ranges() {
        lines.push(format!("  {}", format_range(range, grid.resolution_for(range.field()))));
    }
    lines.push(format!(
        "  Candidates: {}",
        grid.len().map_err(|e| e.to_string())?
    ));
    Ok(lines.join("\n"))
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating tuning file: {}", args.spec.display()),
    );

    let spec = load_spec(&args.spec).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "✓ Tuning file is valid");
    if args.detailed {
        log(level, LogLevel::Normal, &format_details(&spec)?);
    }
    Ok(())
}
