//! New-project scaffolding.
//!
//! `create` lays down the project skeleton idempotently: template files are
//! written only where no file of that name exists, and pre-existing files
//! are reported informationally, never overwritten and never an error.

use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use stratus_config::{Config, DEFAULT_CONFIG_FILENAME};
use stratus_utils::error::StratusError;
use stratus_utils::paths;
use tracing::info;

use crate::collections;
use crate::project::Project;

/// Generated dependency manifest filename at the project root.
pub const PACKAGE_MANIFEST_FILENAME: &str = "package.json";

/// Deployment-tool base dependencies for the generated manifest.
fn deployment_dependencies() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([("serverless", "^3.38.0")])
}

/// Deployment-tool plugins merged on top of the base set.
fn plugin_dependencies() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        ("serverless-python-requirements", "^6.1.0"),
        ("serverless-step-functions", "^3.21.0"),
    ])
}

/// Create a new project skeleton at `path` and return the bound project.
///
/// Writes the default configuration and dependency manifest (skipping any
/// that already exist), then creates one directory per user-extendable
/// category.
pub fn create(path: &Path) -> Result<Project, StratusError> {
    paths::ensure_dir_all(path)?;

    maybe_write_file(path, DEFAULT_CONFIG_FILENAME, Config::default_template())?;
    let manifest = package_manifest().map_err(|e| StratusError::Io(io::Error::other(e)))?;
    maybe_write_file(path, PACKAGE_MANIFEST_FILENAME, &manifest)?;

    let project = Project::new(Some(path.to_path_buf()))?;

    for category in collections::extendable_categories() {
        paths::ensure_dir_all(path.join(category.user_dir_name))?;
    }

    Ok(project)
}

/// Write `name` under `dir` only if absent.
fn maybe_write_file(dir: &Path, name: &str, content: &str) -> io::Result<()> {
    let target = dir.join(name);
    if target.exists() {
        info!("{name} already exists, skipping");
        return Ok(());
    }
    fs::write(target, content)
}

/// The generated dependency manifest: the deployment-tool base set merged
/// with the plugin set into a conventional devDependencies block.
fn package_manifest() -> serde_json::Result<String> {
    let mut dev_dependencies = deployment_dependencies();
    dev_dependencies.extend(plugin_dependencies());

    let manifest = json!({
        "name": "stratus",
        "version": "0.0.0",
        "description": "",
        "devDependencies": dev_dependencies,
    });
    let mut rendered = serde_json::to_string_pretty(&manifest)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn create_lays_down_the_full_skeleton() {
        let td = tempfile::TempDir::new().unwrap();
        let root = td.path().join("pipeline");

        let project = create(&root).unwrap();

        assert_eq!(project.path().unwrap(), root);
        assert!(root.join(DEFAULT_CONFIG_FILENAME).is_file());
        assert!(root.join(PACKAGE_MANIFEST_FILENAME).is_file());
        for category in collections::extendable_categories() {
            assert!(root.join(category.user_dir_name).is_dir());
        }
    }

    #[test]
    fn create_never_overwrites_existing_files() {
        let td = tempfile::TempDir::new().unwrap();
        let root = td.path().join("pipeline");
        create(&root).unwrap();

        let custom = "service: customized\n";
        fs::write(root.join(DEFAULT_CONFIG_FILENAME), custom).unwrap();

        create(&root).unwrap();
        assert_eq!(
            fs::read_to_string(root.join(DEFAULT_CONFIG_FILENAME)).unwrap(),
            custom
        );
    }

    #[test]
    fn package_manifest_merges_both_dependency_tables() {
        let manifest: Value = serde_json::from_str(&package_manifest().unwrap()).unwrap();
        let deps = manifest["devDependencies"].as_object().unwrap();
        assert!(deps.contains_key("serverless"));
        assert!(deps.contains_key("serverless-python-requirements"));
        assert!(deps.contains_key("serverless-step-functions"));
    }
}
