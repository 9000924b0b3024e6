//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Whether anything, including a dangling symlink, exists at `path`.
#[must_use]
pub fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Replace whatever is at `path` with a fresh empty directory.
///
/// A symlink at `path` is removed, never followed.
///
/// # Errors
///
/// Returns an error if the existing entry cannot be removed or the
/// directory cannot be created.
pub fn recreate_dir(path: &Path) -> Result<()> {
    if let Ok(meta) = path.symlink_metadata() {
        if meta.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        }
        .with_context(|| format!("remove existing: {}", path.display()))?;
    }
    std::fs::create_dir_all(path)
        .with_context(|| format!("create directory: {}", path.display()))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("file.txt");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a").join("b").exists());
    }

    #[test]
    fn recreate_dir_empties_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("bundle");
        std::fs::create_dir_all(bundle.join("old-plugin")).unwrap();
        std::fs::write(bundle.join("old-plugin/plugin.vim"), "\" old").unwrap();

        recreate_dir(&bundle).unwrap();

        assert!(bundle.is_dir());
        assert_eq!(std::fs::read_dir(&bundle).unwrap().count(), 0);
    }

    #[test]
    fn recreate_dir_creates_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("bundle");
        recreate_dir(&bundle).unwrap();
        assert!(bundle.is_dir());
    }

    #[test]
    fn recreate_dir_replaces_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("bundle");
        std::fs::write(&bundle, "not a dir").unwrap();
        recreate_dir(&bundle).unwrap();
        assert!(bundle.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn recreate_dir_does_not_follow_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = dir.path().join("elsewhere");
        std::fs::create_dir(&elsewhere).unwrap();
        std::fs::write(elsewhere.join("keep"), "x").unwrap();
        let bundle = dir.path().join("bundle");
        std::os::unix::fs::symlink(&elsewhere, &bundle).unwrap();

        recreate_dir(&bundle).unwrap();

        assert!(elsewhere.join("keep").exists());
        assert!(!bundle.symlink_metadata().unwrap().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn occupied_sees_dangling_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        assert!(!occupied(&link));
        std::os::unix::fs::symlink("/nonexistent/target", &link).unwrap();
        assert!(occupied(&link));
    }
}
