//! End-to-end reconciliation tests against real on-disk projects:
//! scaffold, discover, build, rebuild, clean.

use std::fs;
use std::path::Path;

use stratus::build::{MANIFEST_FILENAME, SCRATCH_DIR_NAME};
use stratus::collections::DEFINITION_FILENAME;
use stratus::{ExitCode, Project, StratusError};

fn scaffold_project(parent: &Path) -> Project {
    Project::create(&parent.join("pipeline")).unwrap()
}

fn add_function(root: &Path, category: &str, name: &str) {
    let dir = root.join(category).join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(DEFINITION_FILENAME), "description: test function\n").unwrap();
    fs::write(
        dir.join("handler.py"),
        "def handler(event, context):\n    return event\n",
    )
    .unwrap();
}

fn remove_function(root: &Path, category: &str, name: &str) {
    fs::remove_dir_all(root.join(category).join(name)).unwrap();
}

#[test]
fn build_materializes_discovered_functions_and_manifest() {
    let td = tempfile::TempDir::new().unwrap();
    let project = scaffold_project(td.path());
    let root = project.path().unwrap().to_path_buf();
    add_function(&root, "feeders", "ingest");
    add_function(&root, "tasks", "resize");

    let report = project.build(false).unwrap();
    assert_eq!(report.materialized_count(), 2);
    assert_eq!(report.skipped_count(), 0);
    assert!(report.removed.is_empty());

    let build_root = project.build_dir().unwrap();
    assert!(build_root.join("feeders/ingest/handler.py").is_file());
    assert!(build_root.join("tasks/resize/handler.py").is_file());
    assert!(build_root.join(MANIFEST_FILENAME).is_file());

    // shared runtime requirement injected into packaging metadata
    let reqs = fs::read_to_string(build_root.join("tasks/resize/requirements.txt")).unwrap();
    assert!(reqs.contains("stratus-lib>="));
}

#[test]
fn rebuild_after_removing_a_definition_removes_only_its_output() {
    let td = tempfile::TempDir::new().unwrap();
    let project = scaffold_project(td.path());
    let root = project.path().unwrap().to_path_buf();
    add_function(&root, "tasks", "f1");
    add_function(&root, "tasks", "f2");

    project.build(false).unwrap();
    let build_root = project.build_dir().unwrap();
    assert!(build_root.join("tasks/f1").is_dir());
    assert!(build_root.join("tasks/f2").is_dir());

    remove_function(&root, "tasks", "f2");
    let report = project.build(false).unwrap();

    assert_eq!(report.removed.len(), 1);
    assert!(report.removed[0].ends_with("tasks/f2"));
    assert!(!build_root.join("tasks/f2").exists());
    assert!(build_root.join("tasks/f1/handler.py").is_file());
    assert!(build_root.join(MANIFEST_FILENAME).is_file());
}

#[test]
fn repeated_builds_are_idempotent() {
    let td = tempfile::TempDir::new().unwrap();
    let project = scaffold_project(td.path());
    let root = project.path().unwrap().to_path_buf();
    add_function(&root, "feeders", "poll");

    let first = project.build(false).unwrap();
    let second = project.build(false).unwrap();

    assert_eq!(first.used_dirs(), second.used_dirs());
    assert!(second.removed.is_empty());
}

#[test]
fn scratch_directory_is_never_treated_as_stale() {
    let td = tempfile::TempDir::new().unwrap();
    let project = scaffold_project(td.path());
    let root = project.path().unwrap().to_path_buf();
    add_function(&root, "tasks", "f1");

    project.build(false).unwrap();
    let scratch = project.build_dir().unwrap().join(SCRATCH_DIR_NAME);
    fs::create_dir_all(scratch.join("cloudformation")).unwrap();

    let report = project.build(false).unwrap();
    assert!(report.removed.is_empty());
    assert!(scratch.join("cloudformation").is_dir());
}

#[test]
fn out_of_band_artifacts_survive_rebuilds() {
    let td = tempfile::TempDir::new().unwrap();
    let project = scaffold_project(td.path());
    let root = project.path().unwrap().to_path_buf();
    add_function(&root, "tasks", "f1");

    project.build(false).unwrap();
    let cached = project.build_dir().unwrap().join("tasks/f1/deps.zip");
    fs::write(&cached, b"bundle").unwrap();

    project.build(false).unwrap();
    assert!(cached.is_file());
}

#[test]
fn manifest_is_rewritten_from_the_project_configuration() {
    let td = tempfile::TempDir::new().unwrap();
    let project = scaffold_project(td.path());
    let root = project.path().unwrap().to_path_buf();

    project.build(false).unwrap();
    let manifest_path = project.build_dir().unwrap().join(MANIFEST_FILENAME);
    fs::write(&manifest_path, "stale: manifest\n").unwrap();

    // fresh Project so the memoized configuration is reloaded
    let project = Project::new(Some(root)).unwrap();
    project.build(false).unwrap();

    let manifest = fs::read_to_string(&manifest_path).unwrap();
    assert!(manifest.contains("service:"));
    assert!(!manifest.contains("stale"));
}

#[test]
fn held_lock_blocks_the_build_and_force_takes_over() {
    let td = tempfile::TempDir::new().unwrap();
    let project = scaffold_project(td.path());
    let root = project.path().unwrap().to_path_buf();
    add_function(&root, "tasks", "f1");

    // simulate a crashed invocation's leftover lock
    fs::write(
        root.join(stratus::lock::LOCK_FILENAME),
        "{\"pid\": 1, \"created_at\": 0}",
    )
    .unwrap();

    let err = project.build(false).unwrap_err();
    assert!(matches!(err, StratusError::Lock(_)));
    assert_eq!(err.to_exit_code(), ExitCode::LOCK_HELD);

    let report = project.build(true).unwrap();
    assert_eq!(report.materialized_count(), 1);
    // lock released after the forced build
    assert!(!root.join(stratus::lock::LOCK_FILENAME).exists());
}
