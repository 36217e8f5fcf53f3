//! Function-collection categories and the per-function collaborator
//! interface consumed by the build reconciler.
//!
//! The reconciler never inspects function internals: it asks each definition
//! for its output directory and tells it to materialize itself. The default
//! [`FsFunction`] implementation copies a source directory into the build
//! output and injects the shared runtime-library requirement into the
//! packaging metadata.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use stratus_utils::error::BuildError;
use stratus_utils::paths;
use tracing::debug;

/// Filename whose presence marks a subdirectory as a function definition.
pub const DEFINITION_FILENAME: &str = "definition.yml";

/// Environment override for the shared runtime-library version.
pub const RUNTIME_LIB_VERSION_ENV: &str = "STRATUS_LIB_VERSION";

/// Version pinned when no override is present.
const DEFAULT_RUNTIME_LIB_VERSION: &str = "0.6";

/// A function-collection category known to the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    /// Directory name users see at the project root.
    pub user_dir_name: &'static str,
    /// Produces lambda-style outputs the reconciler materializes.
    pub buildable: bool,
    /// Users may add their own definitions under this category.
    pub extendable: bool,
}

/// Built-in categories.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "feeders",
        user_dir_name: "feeders",
        buildable: true,
        extendable: true,
    },
    Category {
        name: "tasks",
        user_dir_name: "tasks",
        buildable: true,
        extendable: true,
    },
    Category {
        name: "workflows",
        user_dir_name: "workflows",
        buildable: false,
        extendable: true,
    },
];

/// Categories whose functions are materialized during a build pass.
pub fn buildable_categories() -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(|c| c.buildable)
}

/// Categories that get a directory at the project root on scaffold.
pub fn extendable_categories() -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(|c| c.extendable)
}

/// The per-function collaborator interface.
pub trait FunctionArtifact {
    /// Logical function name.
    fn name(&self) -> &str;

    /// Deterministic output directory under the build root. Pure: no
    /// filesystem access, no side effects.
    fn output_dir(&self, build_root: &Path) -> PathBuf;

    /// Leave a fully usable artifact at `outdir`, or fail.
    ///
    /// Must be safe to call on an already-populated directory: re-builds do
    /// not delete still-used output directories first, so out-of-band
    /// artifacts placed under them survive.
    fn materialize(&self, outdir: &Path, extra_requirements: &[String])
    -> Result<(), BuildError>;
}

/// A category plus its current function definitions.
pub struct Collection {
    pub category: &'static Category,
    pub functions: Vec<Box<dyn FunctionArtifact>>,
}

/// Enumerate the buildable collections of a project.
///
/// For each buildable category, every subdirectory of the category's user
/// directory containing a `definition.yml` yields a function definition.
/// Non-directories and directories without a definition file are skipped.
pub fn discover(project_path: &Path) -> io::Result<Vec<Collection>> {
    let mut collections = Vec::new();
    for category in buildable_categories() {
        let dir = project_path.join(category.user_dir_name);
        let mut functions: Vec<Box<dyn FunctionArtifact>> = Vec::new();
        if dir.is_dir() {
            let mut entries = fs::read_dir(&dir)?.collect::<io::Result<Vec<_>>>()?;
            entries.sort_by_key(std::fs::DirEntry::file_name);
            for entry in entries {
                let source_dir = entry.path();
                if !source_dir.is_dir() {
                    continue;
                }
                if !source_dir.join(DEFINITION_FILENAME).is_file() {
                    debug!(
                        path = %source_dir.display(),
                        "no {DEFINITION_FILENAME}, not a function definition"
                    );
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                functions.push(Box::new(FsFunction {
                    name,
                    category: category.name,
                    source_dir,
                }));
            }
        }
        collections.push(Collection {
            category,
            functions,
        });
    }
    Ok(collections)
}

/// The shared dependency requirement injected into every materialized
/// function's packaging metadata.
#[must_use]
pub fn runtime_requirement() -> String {
    let version = std::env::var(RUNTIME_LIB_VERSION_ENV)
        .unwrap_or_else(|_| DEFAULT_RUNTIME_LIB_VERSION.to_string());
    format!("stratus-lib>={version}")
}

/// Default function definition: a source directory copied into the build
/// output, with the shared requirements appended to `requirements.txt`.
pub struct FsFunction {
    name: String,
    category: &'static str,
    source_dir: PathBuf,
}

impl FsFunction {
    pub fn new(name: impl Into<String>, category: &'static str, source_dir: PathBuf) -> Self {
        Self {
            name: name.into(),
            category,
            source_dir,
        }
    }
}

impl FunctionArtifact for FsFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_dir(&self, build_root: &Path) -> PathBuf {
        build_root.join(self.category).join(&self.name)
    }

    fn materialize(
        &self,
        outdir: &Path,
        extra_requirements: &[String],
    ) -> Result<(), BuildError> {
        let fail = |source: io::Error| BuildError::Materialize {
            function: self.name.clone(),
            source,
        };

        paths::ensure_dir_all(outdir).map_err(fail)?;
        copy_dir_contents(&self.source_dir, outdir).map_err(fail)?;

        let mut requirements = match fs::read_to_string(self.source_dir.join("requirements.txt")) {
            Ok(existing) => existing,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(fail(e)),
        };
        if !requirements.is_empty() && !requirements.ends_with('\n') {
            requirements.push('\n');
        }
        for requirement in extra_requirements {
            requirements.push_str(requirement);
            requirements.push('\n');
        }
        fs::write(outdir.join("requirements.txt"), requirements).map_err(fail)
    }
}

/// Recursive copy of `src`'s contents into `dst`, overwriting files in place.
fn copy_dir_contents(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let source = entry.path();
        let target = dst.join(entry.file_name());
        if source.is_dir() {
            fs::create_dir_all(&target)?;
            copy_dir_contents(&source, &target)?;
        } else {
            fs::copy(&source, &target)?;
        }
    }
    Ok(())
}
