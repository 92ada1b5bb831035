//! Entramado CLI
//!
//! # Usage
//!
//! ```bash
//! # Print the grid described by a tuning file
//! entramado grid tuning.yaml
//! entramado grid tuning.yaml --format json
//!
//! # Validate a tuning file
//! entramado validate tuning.yaml --detailed
//!
//! # Fit a pipeline and sweep its learner
//! entramado demo --max-k 8 --resolution 5
//! ```

use clap::Parser;
use entramado::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
