//! CLI argument definitions and parsing structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stratus - build orchestrator for declarative lambda pipeline projects
#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Reconcile declarative lambda definitions into a deployable build directory")]
#[command(long_about = r#"
stratus turns the function definitions inside a project directory into a
reconciled build directory, ready for the deployment tooling to package.

EXAMPLES:
  # Scaffold a new project
  stratus new my-pipeline

  # Reconcile the build directory from anywhere inside the project
  stratus build

  # Wipe the build directory contents
  stratus clean

  # Operate on a project located elsewhere
  stratus build --chdir /path/to/project

PROJECT LAYOUT:
  A project is any directory containing a stratus.yml configuration file.
  Function definitions live under the category directories (feeders/,
  tasks/), one directory per function with a definition.yml inside.
  Build output is reconciled into .stratus/ next to stratus.yml.

BUILDS:
  Builds are idempotent reconciliations: unchanged outputs are refreshed in
  place, outputs whose definitions disappeared are deleted, and a failed
  build self-heals on the next run.
"#)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory to start project resolution from (defaults to the current directory)
    #[arg(long, global = true)]
    pub chdir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project skeleton
    New {
        /// Directory to scaffold the project into (created if missing)
        path: PathBuf,
    },
    /// Reconcile the build directory against the current function definitions
    Build {
        /// Take over a leftover project lock from a crashed invocation
        #[arg(long)]
        force: bool,
    },
    /// Remove everything under the build directory, leaving it in place
    Clean {
        /// Take over a leftover project lock from a crashed invocation
        #[arg(long)]
        force: bool,
    },
}
