//! Command implementations for the stratus CLI.
//!
//! Each subcommand gets one `execute_*_command` function. User-facing
//! output goes to stdout here; errors propagate to `run()` which owns
//! error output.

use anyhow::{Context, Result};
use std::path::Path;

use crate::build::FunctionOutcome;
use crate::project::Project;

/// Execute `stratus new <path>`: scaffold a project skeleton.
pub fn execute_new_command(path: &Path) -> Result<()> {
    let project = Project::create(path)?;
    let root = project
        .path()
        .context("scaffolded project has no bound path")?;

    println!("✓ Project created: {}", root.display());
    println!(
        "  Edit {} and add function definitions under the category directories",
        stratus_config::DEFAULT_CONFIG_FILENAME
    );
    Ok(())
}

/// Execute `stratus build`: strict-resolve the project, then reconcile.
pub fn execute_build_command(chdir: Option<&Path>, force: bool) -> Result<()> {
    let project = Project::resolve(chdir, true)?;
    if let Some(path) = project.path() {
        println!("Building project: {}", path.display());
    }

    let report = project.build(force)?;

    println!("✓ Materialized {} function(s)", report.materialized_count());
    for entry in report
        .outcomes
        .iter()
        .filter(|e| e.outcome == FunctionOutcome::SkippedDuplicate)
    {
        println!(
            "  ⚠ Skipped '{}': duplicate output directory {}",
            entry.function,
            entry.output_dir.display()
        );
    }
    if !report.removed.is_empty() {
        println!(
            "  Removed {} stale output director{}",
            report.removed.len(),
            if report.removed.len() == 1 { "y" } else { "ies" }
        );
    }
    Ok(())
}

/// Execute `stratus clean`: strict-resolve the project, then empty the
/// build directory.
pub fn execute_clean_command(chdir: Option<&Path>, force: bool) -> Result<()> {
    let project = Project::resolve(chdir, true)?;
    project.clean(force)?;
    println!("✓ Build directory cleaned");
    Ok(())
}
