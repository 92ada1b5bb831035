//! CLI command implementations

mod demo;
mod grid;
mod validate;

#[cfg(test)]
mod tests;

use crate::cli::{init_tracing, LogLevel};
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);
    init_tracing(log_level);

    match cli.command {
        Command::Grid(args) => grid::run_grid(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Demo(args) => demo::run_demo(args, log_level),
    }
}
