//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which parses arguments,
//! initializes logging, dispatches to command handlers, and handles all
//! error output. main.rs only maps the returned exit code.

use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;
use crate::{ExitCode, StratusError};
use stratus_utils::logging;

/// Main CLI execution function.
///
/// Handles ALL output including errors. On success returns `Ok(())`; on
/// error prints the message (plus any suggestions) to stderr and returns
/// the mapped exit code.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose) {
        eprintln!("✗ Failed to initialize logging: {e}");
        return Err(ExitCode::INTERNAL);
    }

    let result = match cli.command {
        Commands::New { path } => commands::execute_new_command(&path),
        Commands::Build { force } => commands::execute_build_command(cli.chdir.as_deref(), force),
        Commands::Clean { force } => commands::execute_clean_command(cli.chdir.as_deref(), force),
    };

    if let Err(error) = result {
        if let Some(stratus_error) = error.downcast_ref::<StratusError>() {
            eprintln!("✗ {stratus_error}");
            let suggestions = stratus_error.suggestions();
            if !suggestions.is_empty() {
                eprintln!();
                for suggestion in suggestions {
                    eprintln!("  hint: {suggestion}");
                }
            }
            return Err(stratus_error.to_exit_code());
        }

        eprintln!("✗ Unexpected error: {error:#}");
        return Err(ExitCode::INTERNAL);
    }

    Ok(())
}
