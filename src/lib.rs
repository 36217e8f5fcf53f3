//! stratus - build orchestrator for declarative lambda pipeline projects
//!
//! A stratus project is a directory tree marked by a `stratus.yml`
//! configuration file. Function definitions live under category
//! directories (`feeders/`, `tasks/`); `stratus build` reconciles them
//! into the `.stratus/` build directory alongside the deployment
//! manifest, and `stratus clean` empties that directory.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Scaffold a project
//! stratus new my-pipeline
//!
//! # Reconcile the build directory (from anywhere inside the project)
//! stratus build
//!
//! # Wipe the build output
//! stratus clean
//! ```
//!
//! # Library usage
//!
//! The same operations are available programmatically:
//!
//! ```rust,no_run
//! use stratus::Project;
//!
//! let project = Project::resolve(None, true)?;
//! let report = project.build(false)?;
//! println!("materialized {}", report.materialized_count());
//! # Ok::<(), stratus::StratusError>(())
//! ```
//!
//! Builds are idempotent reconciliations: running twice with no definition
//! changes performs no deletions, and removing a definition then
//! rebuilding deletes exactly that function's former output directory.

pub mod build;
pub mod cli;
pub mod collections;
pub mod lock;
pub mod project;
pub mod registry;
pub mod scaffold;

/// The project type and its `resolve`/`build`/`clean`/`create` operations.
pub use project::Project;

/// Reconciliation results: per-function outcomes plus removed stale paths.
pub use build::{BuildReport, FunctionOutcome, FunctionReportEntry};

/// Parsed project configuration (`stratus.yml`).
pub use stratus_config::{Config, DEFAULT_CONFIG_FILENAME};

/// Library-level error type; maps to CLI exit codes via `to_exit_code()`.
pub use stratus_utils::error::StratusError;

/// Exit codes matching the documented exit code table.
pub use stratus_utils::exit_codes::ExitCode;

/// Error sub-taxonomies, re-exported for matching.
pub use stratus_utils::error;
