//! Error taxonomy for stratus.
//!
//! `StratusError` is the library-level error type returned by stratus
//! operations. Library code returns `StratusError` and does NOT call
//! `std::process::exit()`; the CLI maps errors to exit codes via
//! [`StratusError::to_exit_code`] and prints user-facing messages.
//!
//! The taxonomy follows the operations it guards:
//!
//! | Variant | Meaning | Exit code |
//! |---------|---------|-----------|
//! | `Config` | Unbound project path or bad configuration file | 2 |
//! | `Resolution` | Strict ancestor search found no project root | 3 |
//! | `Build` | Filesystem failure during a build pass | 4 |
//! | `Lock` | Project lock already held or unacquirable | 9 |
//! | `Io` | Other filesystem failure (clean, scaffold) | 1 |

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Library-level error type for stratus operations.
#[derive(Error, Debug)]
pub enum StratusError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("project resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl StratusError {
    /// Map this error to the documented CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Resolution(_) => ExitCode::UNRESOLVED_PROJECT,
            Self::Build(_) => ExitCode::BUILD_FAILURE,
            Self::Lock(_) => ExitCode::LOCK_HELD,
            Self::Io(_) => ExitCode::INTERNAL,
        }
    }

    /// Suggested actions for resolving the error, shown by the CLI
    /// after the error message itself.
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(ConfigError::PathUnset { .. }) | Self::Resolution(_) => vec![
                "run from inside a stratus project (a directory tree containing stratus.yml)"
                    .to_string(),
                "or create one first with `stratus new <path>`".to_string(),
            ],
            Self::Config(ConfigError::NotAProject { .. }) => vec![
                "a project directory must contain a stratus.yml configuration file".to_string(),
            ],
            Self::Lock(LockError::AlreadyHeld { .. }) => vec![
                "wait for the other stratus invocation to finish".to_string(),
                "if it crashed, re-run with --force to take over the lock".to_string(),
            ],
            Self::Build(_) => vec![
                "builds are self-healing: fix the underlying problem and re-run `stratus build`"
                    .to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

/// Configuration-related errors: unbound project paths and bad config files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot {operation} a project without the path set")]
    PathUnset { operation: &'static str },

    #[error("not a valid project (no stratus.yml): {path}")]
    NotAProject { path: PathBuf },

    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("invalid configuration file {path}: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    #[error("failed to write configuration to {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

/// Strict project resolution failed: no ancestor of the start path is a
/// project root.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("unable to resolve a project root from {start} with strict resolution specified")]
    NotFound { start: PathBuf },
}

/// Filesystem failures during a build pass, tagged with the step that failed.
///
/// None of these are retried automatically; a subsequent `build` call
/// reconciles from whatever state remains on disk.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("failed to create build root {path}: {source}")]
    CreateBuildRoot { path: PathBuf, source: io::Error },

    #[error("failed to snapshot existing outputs under {path}: {source}")]
    Snapshot { path: PathBuf, source: io::Error },

    #[error("failed to write deployment manifest {path}: {reason}")]
    WriteManifest { path: PathBuf, reason: String },

    #[error("failed to materialize function '{function}': {source}")]
    Materialize { function: String, source: io::Error },

    #[error("failed to remove stale output directory {path}: {source}")]
    RemoveStale { path: PathBuf, source: io::Error },
}

/// Advisory project-lock failures.
#[derive(Error, Debug)]
pub enum LockError {
    #[error("another stratus invocation holds the project lock {path} (pid {pid})")]
    AlreadyHeld { path: PathBuf, pid: u32 },

    #[error("failed to acquire project lock {path}: {reason}")]
    AcquisitionFailed { path: PathBuf, reason: String },
}
