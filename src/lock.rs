//! Advisory per-project lock serializing build and clean invocations.
//!
//! The reconcile algorithm is not safe under concurrent mutation of the
//! same build root, so `build` and `clean` hold an exclusive lock file at
//! the project root for their duration. The lock coordinates stratus
//! invocations; it is not a security boundary.

use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use stratus_utils::error::LockError;
use tracing::{debug, warn};

/// Lock filename at the project root.
pub const LOCK_FILENAME: &str = ".stratus.lock";

/// Owner information written into the lock file for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Process ID that created the lock.
    pub pid: u32,
    /// Seconds since the UNIX epoch at acquisition.
    pub created_at: u64,
}

/// Exclusive advisory lock on a project, released on drop.
pub struct BuildLock {
    lock_path: PathBuf,
    // Keeps the descriptor alive until drop.
    _fd_lock: Box<RwLock<File>>,
}

impl BuildLock {
    /// Try to acquire the project lock.
    ///
    /// Acquisition uses `create_new` (O_EXCL) semantics so two invocations
    /// cannot race past each other. With `force`, a leftover lock file from
    /// a crashed invocation is removed and acquisition retried once.
    pub fn acquire(project_path: &Path, force: bool) -> Result<Self, LockError> {
        let lock_path = project_path.join(LOCK_FILENAME);
        match Self::try_create(&lock_path) {
            Ok(lock) => Ok(lock),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let holder = Self::read_holder(&lock_path);
                if force {
                    warn!(
                        path = %lock_path.display(),
                        pid = holder,
                        "forcing takeover of existing project lock"
                    );
                    fs::remove_file(&lock_path).map_err(|remove_err| {
                        LockError::AcquisitionFailed {
                            path: lock_path.clone(),
                            reason: format!("failed to remove existing lock: {remove_err}"),
                        }
                    })?;
                    Self::try_create(&lock_path).map_err(|retry_err| {
                        LockError::AcquisitionFailed {
                            path: lock_path.clone(),
                            reason: retry_err.to_string(),
                        }
                    })
                } else {
                    Err(LockError::AlreadyHeld {
                        path: lock_path,
                        pid: holder,
                    })
                }
            }
            Err(e) => Err(LockError::AcquisitionFailed {
                path: lock_path,
                reason: e.to_string(),
            }),
        }
    }

    /// Path of the held lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.lock_path
    }

    fn try_create(lock_path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(lock_path)?;

        let info = LockInfo {
            pid: process::id(),
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        let mut fd_lock = Box::new(RwLock::new(file));
        {
            // Exclusive descriptor lock plus owner info, written in one step.
            let guard = fd_lock.try_write()?;
            let mut file_ref = &*guard;
            let rendered = serde_json::to_string_pretty(&info).map_err(io::Error::other)?;
            file_ref.write_all(rendered.as_bytes())?;
            file_ref.flush()?;
        }

        debug!(path = %lock_path.display(), "acquired project lock");
        Ok(Self {
            lock_path: lock_path.to_path_buf(),
            _fd_lock: fd_lock,
        })
    }

    /// Best-effort read of the lock holder's pid; 0 when unreadable.
    fn read_holder(lock_path: &Path) -> u32 {
        fs::read_to_string(lock_path)
            .ok()
            .and_then(|raw| serde_json::from_str::<LockInfo>(&raw).ok())
            .map_or(0, |info| info.pid)
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        // Best-effort cleanup; a leftover file is recoverable via --force.
        let _ = fs::remove_file(&self.lock_path);
    }
}

impl std::fmt::Debug for BuildLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildLock")
            .field("lock_path", &self.lock_path)
            .field("_fd_lock", &"<RwLock>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquisition_fails_while_held() {
        let td = tempfile::TempDir::new().unwrap();
        let _held = BuildLock::acquire(td.path(), false).unwrap();

        let err = BuildLock::acquire(td.path(), false).unwrap_err();
        assert!(matches!(err, LockError::AlreadyHeld { pid, .. } if pid == process::id()));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let td = tempfile::TempDir::new().unwrap();
        {
            let lock = BuildLock::acquire(td.path(), false).unwrap();
            assert!(lock.path().is_file());
        }
        assert!(!td.path().join(LOCK_FILENAME).exists());
        let _reacquired = BuildLock::acquire(td.path(), false).unwrap();
    }

    #[test]
    fn force_takes_over_a_leftover_lock() {
        let td = tempfile::TempDir::new().unwrap();
        // simulate a crashed invocation: lock file without a live owner
        fs::write(td.path().join(LOCK_FILENAME), "{\"pid\": 1, \"created_at\": 0}").unwrap();

        let err = BuildLock::acquire(td.path(), false).unwrap_err();
        assert!(matches!(err, LockError::AlreadyHeld { pid: 1, .. }));

        let lock = BuildLock::acquire(td.path(), true).unwrap();
        assert!(lock.path().is_file());
    }
}
