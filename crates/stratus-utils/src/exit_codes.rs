//! Exit code constants and error mapping for stratus.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `UNRESOLVED_PROJECT` | Strict project resolution found no project root |
//! | 4 | `BUILD_FAILURE` | Filesystem failure during a build pass |
//! | 9 | `LOCK_HELD` | Another process holds the project lock |

/// Type-safe exit codes for stratus operations.
///
/// Use the named constants for common exit codes, or [`as_i32()`](Self::as_i32)
/// to get the numeric value for `std::process::exit()`. The numeric values are
/// part of the public CLI contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Strict project resolution found no project root in any ancestor
    pub const UNRESOLVED_PROJECT: ExitCode = ExitCode(3);

    /// Filesystem failure during build-root creation, manifest write,
    /// materialization, or stale-directory deletion
    pub const BUILD_FAILURE: ExitCode = ExitCode(4);

    /// Another process already holds the project lock
    pub const LOCK_HELD: ExitCode = ExitCode(9);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an `ExitCode` from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
