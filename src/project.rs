//! `Project`: a directory tree rooted at a `stratus.yml` marker file.
//!
//! A project is identified by an absolute filesystem path, or is unbound
//! (no path). A bound path always points at a directory containing the
//! marker configuration file; every path assignment re-registers the
//! project in the process-wide registry so loosely-coupled collaborators
//! can find it.

use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};

use stratus_config::{Config, DEFAULT_CONFIG_FILENAME};
use stratus_utils::error::{ConfigError, ResolutionError, StratusError};
use stratus_utils::paths;
use tracing::debug;

use crate::build::{self, BuildReport};
use crate::collections;
use crate::lock::BuildLock;
use crate::registry;
use crate::scaffold;

/// Build output directory name under the project root.
pub const BUILD_DIR_NAME: &str = ".stratus";

#[derive(Debug)]
pub struct Project {
    path: Option<PathBuf>,
    config: OnceCell<Config>,
}

impl Project {
    /// Construct a project bound to `path` (validated as a project root),
    /// or an unbound project for `None`.
    pub fn new(path: Option<PathBuf>) -> Result<Self, StratusError> {
        let mut project = Self {
            path: None,
            config: OnceCell::new(),
        };
        project.set_path(path)?;
        Ok(project)
    }

    /// Find a project root by walking `start` (default: the current working
    /// directory) and its ancestors for the marker configuration file.
    ///
    /// Returns a project bound to the first matching ancestor, or an unbound
    /// project if none matches. With `strict`, a miss is a
    /// [`ResolutionError`] instead. Read-only: never mutates the filesystem.
    pub fn resolve(start: Option<&Path>, strict: bool) -> Result<Self, StratusError> {
        let start = match start {
            Some(p) => paths::absolutize(p)?,
            None => env::current_dir()?,
        };

        let project_path = start
            .ancestors()
            .find(|candidate| Self::dir_is_project(candidate))
            .map(Path::to_path_buf);

        if strict && project_path.is_none() {
            return Err(ResolutionError::NotFound { start }.into());
        }

        Self::new(project_path)
    }

    /// Whether `path` looks like a project root: the marker configuration
    /// file is present as a regular file. Contents are not inspected.
    #[must_use]
    pub fn dir_is_project(path: &Path) -> bool {
        path.join(DEFAULT_CONFIG_FILENAME).is_file()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-bind the project path.
    ///
    /// Validates that a `Some` path is a project root, drops any memoized
    /// configuration, and re-registers in the process-wide registry
    /// (including for `None`).
    pub fn set_path(&mut self, path: Option<PathBuf>) -> Result<(), StratusError> {
        if let Some(p) = &path {
            if !Self::dir_is_project(p) {
                return Err(ConfigError::NotAProject { path: p.clone() }.into());
            }
        }
        self.path = path;
        self.config = OnceCell::new();
        registry::with(|r| r.register_project(self));
        debug!(path = ?self.path, "registered active project");
        Ok(())
    }

    /// Project configuration, loaded from the marker file on first access
    /// and memoized until the path changes.
    pub fn config(&self) -> Result<&Config, StratusError> {
        let path = self.path.as_deref().ok_or(ConfigError::PathUnset {
            operation: "configure",
        })?;
        self.config
            .get_or_try_init(|| Config::from_project(path))
            .map_err(StratusError::Config)
    }

    /// `<project>/.stratus`, or `None` when unbound.
    #[must_use]
    pub fn build_dir(&self) -> Option<PathBuf> {
        self.path.as_ref().map(|p| p.join(BUILD_DIR_NAME))
    }

    /// Scaffold a new project skeleton at `path` and return it.
    pub fn create(path: &Path) -> Result<Self, StratusError> {
        scaffold::create(path)
    }

    /// Reconcile the build directory against the current function
    /// definitions. Takes the project lock for the duration; `force` takes
    /// over a leftover lock from a crashed invocation.
    pub fn build(&self, force: bool) -> Result<BuildReport, StratusError> {
        let path = self
            .path
            .as_deref()
            .ok_or(ConfigError::PathUnset { operation: "build" })?;
        let _lock = BuildLock::acquire(path, force)?;
        let collections = collections::discover(path)?;
        build::reconcile(self, &collections)
    }

    /// Remove everything under the build directory, leaving the directory
    /// itself in place. A missing build directory is a no-op.
    pub fn clean(&self, force: bool) -> Result<(), StratusError> {
        let path = self
            .path
            .as_deref()
            .ok_or(ConfigError::PathUnset { operation: "clean" })?;
        let _lock = BuildLock::acquire(path, force)?;
        build::clean(self)
    }
}
