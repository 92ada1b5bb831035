//! Tests for CLI command handlers

use std::io::Write;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;

use super::demo::{demo_data, sweep};
use super::grid::{format_row, row_object, run_grid};
use super::validate::{format_details, format_range, run_validate};
use crate::cli::LogLevel;
use crate::config::{parse_spec, GridArgs, OutputFormat, ValidateArgs};
use crate::tuning::ParameterValue;

const SPEC: &str = "model: knn_regressor\nresolution: 3\nranges:\n  - field: k\n    lower: 1\n    upper: 5\n  - field: metric\n    values: [euclidean, manhattan]\n";

fn spec_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

// -------------------------------------------------------------------------
// grid
// -------------------------------------------------------------------------

#[test]
fn test_format_row() {
    let row = vec![
        ("k".to_string(), ParameterValue::Int(3)),
        ("metric".to_string(), ParameterValue::from("manhattan")),
    ];
    assert_eq!(format_row(&row), "k=3 metric=manhattan");
    let object = row_object(&row);
    assert_eq!(object["k"], 3);
    assert_eq!(object["metric"], "manhattan");
}

#[test]
fn test_run_grid_all_formats() {
    let file = spec_file(SPEC);
    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Yaml] {
        let args = GridArgs {
            spec: file.path().to_path_buf(),
            format,
        };
        run_grid(args, LogLevel::Quiet).expect("grid succeeds");
    }
}

#[test]
fn test_run_grid_missing_file() {
    let args = GridArgs {
        spec: PathBuf::from("/nonexistent/spec.yaml"),
        format: OutputFormat::Text,
    };
    let err = run_grid(args, LogLevel::Quiet).expect_err("missing file");
    assert!(err.starts_with("Config error"));
}

// -------------------------------------------------------------------------
// validate
// -------------------------------------------------------------------------

#[test]
fn test_run_validate() {
    let file = spec_file(SPEC);
    let args = ValidateArgs {
        spec: file.path().to_path_buf(),
        detailed: true,
    };
    run_validate(args, LogLevel::Quiet).expect("valid");
}

#[test]
fn test_run_validate_rejects_invalid_file() {
    let file = spec_file("model: knn_regressor\nranges: []\n");
    let args = ValidateArgs {
        spec: file.path().to_path_buf(),
        detailed: false,
    };
    let err = run_validate(args, LogLevel::Quiet).expect_err("no ranges");
    assert!(err.contains("at least one range"));
}

#[test]
fn test_format_details() {
    let spec = parse_spec(SPEC).expect("valid");
    let details = format_details(&spec).expect("details");
    assert!(details.contains("Model: KnnRegressor"));
    assert!(details.contains("k: integer [1, 5] scale=linear points=3"));
    assert!(details.contains("metric: nominal [euclidean, manhattan]"));
    assert!(details.contains("Candidates: 6"));
}

#[test]
fn test_format_range_log_scale() {
    let spec = parse_spec(
        "model: constant_regressor\nranges:\n  - field: shrinkage\n    lower: 0.1\n    upper: 1.0\n    scale: log\n",
    )
    .expect("valid");
    let grid = spec.grid().expect("grid");
    let line = format_range(&grid.ranges()[0], 4);
    assert!(line.contains("shrinkage: real"));
    assert!(line.contains("scale=log"));
}

// -------------------------------------------------------------------------
// demo
// -------------------------------------------------------------------------

#[test]
fn test_demo_data_shape() {
    let (x, y) = demo_data();
    assert_eq!(x.nrows(), 16);
    assert_eq!(y.nrows(), 16);
    assert_eq!(x.as_table().map(|t| t.ncols()), Some(2));
}

#[test]
fn test_sweep_retrains_learner_only() {
    let steps = sweep(6, 4, -1).expect("sweep");
    let ks: Vec<usize> = steps[..4].iter().map(|s| s.k).collect();
    assert_eq!(ks, vec![1, 3, 4, 6]);
    for step in &steps[..4] {
        assert_eq!(step.retrained, vec!["learner"]);
    }
    // k = 1 reproduces every training target
    assert_abs_diff_eq!(steps[0].mse, 0.0, epsilon = 1e-9);
}

#[test]
fn test_sweep_feature_change_retrains_downstream() {
    let steps = sweep(2, 2, -1).expect("sweep");
    let last = steps.last().expect("final step");
    assert_eq!(last.label, "unscaled features");
    assert_eq!(last.retrained, vec!["transformer", "learner"]);
}

#[test]
fn test_sweep_rejects_bad_bounds() {
    let err = sweep(0, 3, -1).expect_err("upper < lower");
    assert!(err.starts_with("Range error"));
}
