//! CLI argument types

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Entramado: learning networks and hyperparameter grids
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "entramado")]
#[command(version)]
#[command(about = "Composable learning networks with selective retraining and grid tuning")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the grid described by a tuning file
    Grid(GridArgs),

    /// Validate a tuning file without generating output
    Validate(ValidateArgs),

    /// Fit a transformed-target pipeline and tune its learner
    Demo(DemoArgs),
}

/// Arguments for the grid command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct GridArgs {
    /// Path to YAML tuning file
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML tuning file
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Show the resolved ranges
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the demo command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct DemoArgs {
    /// Largest neighbour count to try
    #[arg(long, default_value_t = 6)]
    pub max_k: i64,

    /// Number of `k` values to try between 1 and `max_k`
    #[arg(short, long, default_value_t = 4)]
    pub resolution: usize,
}

/// Output format for printed results
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {s}. Valid formats: text, json, yaml"
            )),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
