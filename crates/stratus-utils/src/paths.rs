//! Small filesystem path helpers shared across the stratus crates.

use std::io;
use std::path::{Path, PathBuf};

/// mkdir -p; treat `AlreadyExists` as success (removes TOCTTOU races)
pub fn ensure_dir_all<P: AsRef<Path>>(p: P) -> io::Result<()> {
    match std::fs::create_dir_all(&p) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e),
    }
}

/// Make a path absolute.
///
/// Existing paths are canonicalized (symlinks resolved); paths that do not
/// exist yet are joined onto the current working directory if relative.
pub fn absolutize<P: AsRef<Path>>(p: P) -> io::Result<PathBuf> {
    let p = p.as_ref();
    match std::fs::canonicalize(p) {
        Ok(abs) => Ok(abs),
        Err(_) if p.is_absolute() => Ok(p.to_path_buf()),
        Err(_) => Ok(std::env::current_dir()?.join(p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_all_is_idempotent() {
        let td = tempfile::TempDir::new().unwrap();
        let dir = td.path().join("a").join("b");
        ensure_dir_all(&dir).unwrap();
        assert!(dir.is_dir());
        ensure_dir_all(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn absolutize_resolves_existing_paths() {
        let td = tempfile::TempDir::new().unwrap();
        let abs = absolutize(td.path()).unwrap();
        assert!(abs.is_absolute());
        assert_eq!(abs, std::fs::canonicalize(td.path()).unwrap());
    }

    #[test]
    fn absolutize_keeps_missing_absolute_paths() {
        let td = tempfile::TempDir::new().unwrap();
        let missing = td.path().join("does-not-exist");
        let abs = absolutize(&missing).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("does-not-exist"));
    }
}
