//! Process-wide registry of the active project.
//!
//! Independently-loaded collaborators find "the current project" here
//! instead of having it threaded through every call. The registry is an
//! explicit object: operate on a local instance where possible, or go
//! through [`with`] for the mutex-guarded process-wide one. It stores a
//! snapshot of the active project's path, replaced on every path
//! assignment (including to `None`).

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::collections::{self, Category};
use crate::project::Project;

#[derive(Debug, Default)]
pub struct ProjectRegistry {
    active: Option<PathBuf>,
}

impl ProjectRegistry {
    /// Replace the active-project reference with a snapshot of `project`'s
    /// path. Fired on every `Project` path assignment.
    pub fn register_project(&mut self, project: &Project) {
        self.active = project.path().map(Path::to_path_buf);
    }

    /// Path of the most recently registered project, if it was bound.
    #[must_use]
    pub fn active_project(&self) -> Option<PathBuf> {
        self.active.clone()
    }

    /// Function-collection categories known to the system.
    #[must_use]
    pub fn categories(&self) -> &'static [Category] {
        collections::CATEGORIES
    }
}

static GLOBAL: OnceLock<Mutex<ProjectRegistry>> = OnceLock::new();

/// The process-wide registry instance.
pub fn global() -> &'static Mutex<ProjectRegistry> {
    GLOBAL.get_or_init(|| Mutex::new(ProjectRegistry::default()))
}

/// Run `f` with the process-wide registry locked.
///
/// The registry holds only plain data, so a poisoned mutex is recovered
/// rather than propagated.
pub fn with<R>(f: impl FnOnce(&mut ProjectRegistry) -> R) -> R {
    let mut guard = global().lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}
