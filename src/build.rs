//! Build reconciliation: converge the build root to the current set of
//! function definitions, plus the clean operator that empties it.
//!
//! A build pass is an idempotent reconciliation, not a clean rebuild:
//! output directories still claimed by a definition are left in place
//! (preserving out-of-band artifacts under them), and only directories no
//! longer claimed are deleted. A failed pass is never rolled back; the
//! next pass reconciles from whatever state remains.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use stratus_utils::error::{BuildError, ConfigError, StratusError};
use stratus_utils::paths;
use tracing::{debug, info};

use crate::collections::{self, Collection};
use crate::project::{BUILD_DIR_NAME, Project};

/// Deployment manifest filename, rewritten at the build root on every pass.
pub const MANIFEST_FILENAME: &str = "serverless.yml";

/// Deployment-tool scratch directory at the build root; never enumerated
/// as a collection directory and never removed as stale.
pub const SCRATCH_DIR_NAME: &str = ".serverless";

/// Per-function result of a build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionOutcome {
    /// The function's artifact was materialized into its output directory.
    Materialized,
    /// Another definition already claimed the same output directory; this
    /// one was skipped. Deliberately not an error: one misconfigured
    /// function must not block the rest.
    SkippedDuplicate,
}

/// One function's entry in the build report.
#[derive(Debug, Clone)]
pub struct FunctionReportEntry {
    pub function: String,
    /// Canonical (symlink-resolved) output directory.
    pub output_dir: PathBuf,
    pub outcome: FunctionOutcome,
}

/// Outcome of a reconciliation pass, aggregated as data so callers can
/// assert on results without scraping logs.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub outcomes: Vec<FunctionReportEntry>,
    /// Stale output directories removed at the end of the pass.
    pub removed: Vec<PathBuf>,
}

impl BuildReport {
    #[must_use]
    pub fn materialized_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|e| e.outcome == FunctionOutcome::Materialized)
            .count()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|e| e.outcome == FunctionOutcome::SkippedDuplicate)
            .count()
    }

    /// Canonical output directories claimed during this pass.
    #[must_use]
    pub fn used_dirs(&self) -> BTreeSet<PathBuf> {
        self.outcomes
            .iter()
            .filter(|e| e.outcome == FunctionOutcome::Materialized)
            .map(|e| e.output_dir.clone())
            .collect()
    }
}

/// Reconcile the project's build root against `collections`.
///
/// Steps: ensure the build root exists, snapshot existing outputs, rewrite
/// the deployment manifest, materialize every buildable function (skipping
/// duplicate output directories), then delete outputs no longer claimed.
pub fn reconcile(
    project: &Project,
    collections: &[Collection],
) -> Result<BuildReport, StratusError> {
    let project_path = project
        .path()
        .ok_or(ConfigError::PathUnset { operation: "build" })?;
    let build_root = project_path.join(BUILD_DIR_NAME);

    paths::ensure_dir_all(&build_root).map_err(|e| BuildError::CreateBuildRoot {
        path: build_root.clone(),
        source: e,
    })?;

    let existing = snapshot_existing(&build_root).map_err(|e| BuildError::Snapshot {
        path: build_root.clone(),
        source: e,
    })?;

    let manifest_path = build_root.join(MANIFEST_FILENAME);
    project
        .config()?
        .to_file(&manifest_path)
        .map_err(|e| BuildError::WriteManifest {
            path: manifest_path,
            reason: e.to_string(),
        })?;

    // shared runtime-library requirement injected into every function
    let extra_requirements = vec![collections::runtime_requirement()];

    let mut used: BTreeSet<PathBuf> = BTreeSet::new();
    let mut report = BuildReport::default();

    for collection in collections.iter().filter(|c| c.category.buildable) {
        for function in &collection.functions {
            let outdir = function.output_dir(&build_root);
            let canonical =
                canonical_outdir(&outdir).map_err(|e| BuildError::Materialize {
                    function: function.name().to_string(),
                    source: e,
                })?;

            if used.contains(&canonical) {
                debug!(
                    function = function.name(),
                    outdir = %outdir.display(),
                    "duplicate output directory, skipping"
                );
                report.outcomes.push(FunctionReportEntry {
                    function: function.name().to_string(),
                    output_dir: canonical,
                    outcome: FunctionOutcome::SkippedDuplicate,
                });
                continue;
            }

            used.insert(canonical.clone());
            function.materialize(&outdir, &extra_requirements)?;
            report.outcomes.push(FunctionReportEntry {
                function: function.name().to_string(),
                output_dir: canonical,
                outcome: FunctionOutcome::Materialized,
            });
        }
    }

    for stale in existing.difference(&used) {
        debug!(path = %stale.display(), "removing stale output directory");
        fs::remove_dir_all(stale).map_err(|e| BuildError::RemoveStale {
            path: stale.clone(),
            source: e,
        })?;
        report.removed.push(stale.clone());
    }

    info!(
        materialized = report.materialized_count(),
        skipped = report.skipped_count(),
        removed = report.removed.len(),
        "build reconciled"
    );
    Ok(report)
}

/// Remove everything under the project's build root, leaving the root
/// itself in place. A missing build root is vacuous success.
pub fn clean(project: &Project) -> Result<(), StratusError> {
    let project_path = project
        .path()
        .ok_or(ConfigError::PathUnset { operation: "clean" })?;
    let build_root = project_path.join(BUILD_DIR_NAME);
    if !build_root.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(&build_root)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// The directory must exist before symlinks can be resolved, so create
/// first, then canonicalize.
fn canonical_outdir(outdir: &Path) -> io::Result<PathBuf> {
    paths::ensure_dir_all(outdir)?;
    fs::canonicalize(outdir)
}

/// Enumerate existing function output directories, two levels deep
/// (collection directory, then function directory), skipping the reserved
/// scratch directory and non-directory entries at both levels.
fn snapshot_existing(build_root: &Path) -> io::Result<BTreeSet<PathBuf>> {
    let mut existing = BTreeSet::new();
    for entry in fs::read_dir(build_root)? {
        let entry = entry?;
        let collection_dir = entry.path();
        if !collection_dir.is_dir() || entry.file_name() == SCRATCH_DIR_NAME {
            continue;
        }
        for sub in fs::read_dir(&collection_dir)? {
            let function_dir = sub?.path();
            if !function_dir.is_dir() {
                continue;
            }
            existing.insert(fs::canonicalize(&function_dir)?);
        }
    }
    Ok(existing)
}
