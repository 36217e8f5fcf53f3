//! Shared utilities for stratus.
//!
//! This crate holds the cross-cutting pieces every other stratus crate needs:
//! the error taxonomy, CLI exit codes, tracing initialization, and small
//! filesystem path helpers.

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod paths;

pub use error::StratusError;
pub use exit_codes::ExitCode;
