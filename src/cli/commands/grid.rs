//! Grid command implementation

use serde_json::{Map, Value};

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, GridArgs, OutputFormat};
use crate::tuning::GridRow;

/// One grid row as a `{field: value}` object
pub fn row_object(row: &GridRow) -> Value {
    Value::Object(
        row.iter()
            .map(|(field, value)| (field.clone(), value.to_json()))
            .collect::<Map<_, _>>(),
    )
}

/// One grid row as `field=value` pairs
pub fn format_row(row: &GridRow) -> String {
    row.iter()
        .map(|(field, value)| format!("{field}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn run_grid(args: GridArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_spec(&args.spec).map_err(|e| format!("Config error: {e}"))?;
    let rows = spec
        .grid()
        .and_then(|grid| Ok(grid.rows()?))
        .map_err(|e| format!("Grid error: {e}"))?;

    match args.format {
        OutputFormat::Text => {
            log(
                level,
                LogLevel::Normal,
                &format!("{} grid for {} ({} rows):", spec.model.name(), args.spec.display(), rows.len()),
            );
            for (i, row) in rows.iter().enumerate() {
                println!("{i:>4}  {}", format_row(row));
            }
        }
        OutputFormat::Json => {
            let rows: Vec<Value> = rows.iter().map(row_object).collect();
            let json = serde_json::to_string_pretty(&rows)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let rows: Vec<Value> = rows.iter().map(row_object).collect();
            let yaml = serde_yaml::to_string(&rows)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}
