//! Backup destination resolution
//!
//! Every destination directory is resolved against a single trusted base
//! directory. User-supplied subpaths are normalized lexically (no symlink
//! resolution, the target usually does not exist yet) and rejected if the
//! result is not the base itself or one of its descendants.

use crate::core::naming::NamingPolicy;
use crate::domain::{BackupError, Item, Result};
use chrono::NaiveDate;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Absolute, normalized root that all backups stay under
///
/// Created once per process from configuration and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupBase(PathBuf);

impl BackupBase {
    /// Make `path` absolute (relative to the working directory), normalize it
    /// and create it if missing
    ///
    /// # Errors
    ///
    /// Returns `Io` if the working directory cannot be read or the directory
    /// cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| {
                    BackupError::Io(format!("Cannot determine working directory: {e}"))
                })?
                .join(path)
        };
        let normalized = normalize_lexically(&absolute);

        std::fs::create_dir_all(&normalized).map_err(|e| {
            BackupError::Io(format!(
                "Cannot create backup base directory {}: {e}",
                normalized.display()
            ))
        })?;

        Ok(Self(normalized))
    }

    /// The base directory path
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for BackupBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for BackupBase {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Resolves per-item destination directories inside a [`BackupBase`]
#[derive(Debug, Clone)]
pub struct PathSandbox {
    base: BackupBase,
    naming: Arc<dyn NamingPolicy>,
}

impl PathSandbox {
    /// Create a sandbox rooted at `base` using `naming` for default subpaths
    pub fn new(base: BackupBase, naming: Arc<dyn NamingPolicy>) -> Self {
        Self { base, naming }
    }

    /// The sandbox root
    pub fn base(&self) -> &BackupBase {
        &self.base
    }

    /// Subpath an item would get when the user supplies none
    pub fn default_subpath(&self, item: &Item, run_date: NaiveDate) -> String {
        self.naming.default_subpath(item, run_date)
    }

    /// Resolve `subpath` to an absolute path inside the base, without touching
    /// the filesystem
    ///
    /// An empty subpath resolves to the base itself. Absolute subpaths are
    /// accepted only when they point inside the base.
    ///
    /// # Errors
    ///
    /// Returns `PathTraversal` when the normalized path leaves the base.
    pub fn resolve(&self, subpath: &str) -> Result<PathBuf> {
        let trimmed = subpath.trim();
        let candidate = Path::new(trimmed);
        let joined = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.base.path().join(candidate)
        };
        let normalized = normalize_lexically(&joined);

        if !normalized.starts_with(self.base.path()) {
            tracing::warn!(
                subpath = %trimmed,
                base = %self.base,
                "Rejected backup subpath outside base directory"
            );
            return Err(BackupError::PathTraversal {
                subpath: trimmed.to_string(),
                base: self.base.path().to_path_buf(),
            });
        }

        Ok(normalized)
    }

    /// Resolve `subpath` and create the directory
    ///
    /// # Errors
    ///
    /// Returns `PathTraversal` if the subpath escapes the base, or `Io` if the
    /// directory cannot be created.
    pub fn prepare(&self, subpath: &str) -> Result<PathBuf> {
        let destination = self.resolve(subpath)?;

        std::fs::create_dir_all(&destination).map_err(|e| {
            BackupError::Io(format!(
                "Cannot create backup directory {}: {e}",
                destination.display()
            ))
        })?;

        Ok(destination)
    }

    /// Resolve the destination directory for `item` and make sure it exists
    ///
    /// A missing or blank `user_subpath` falls back to the naming policy for
    /// this item and `run_date`. Existing directories are reused as-is.
    ///
    /// # Errors
    ///
    /// Returns `PathTraversal` if the subpath escapes the base, or `Io` if the
    /// directory cannot be created.
    pub fn resolve_destination(
        &self,
        user_subpath: Option<&str>,
        item: &Item,
        run_date: NaiveDate,
    ) -> Result<PathBuf> {
        let subpath = match user_subpath.map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => self.default_subpath(item, run_date),
        };

        let destination = self.prepare(&subpath)?;

        tracing::debug!(
            item_id = %item.id,
            destination = %destination.display(),
            "Resolved backup destination"
        );

        Ok(destination)
    }
}

/// Normalize a path without consulting the filesystem
///
/// Drops `.` segments and repeated separators, and lets `..` remove the
/// previous segment. `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(segment) => normalized.push(segment),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::naming::DatedLayout;
    use crate::domain::{FolderId, FolderRef, ItemId, ItemKind};
    use tempfile::TempDir;

    fn sandbox(dir: &TempDir) -> PathSandbox {
        let base = BackupBase::new(dir.path().join("backups")).unwrap();
        PathSandbox::new(base, Arc::new(DatedLayout))
    }

    fn roads() -> Item {
        Item::new(
            ItemId::new("abc123").unwrap(),
            "Roads",
            ItemKind::FeatureLayer,
            FolderRef {
                id: Some(FolderId::new("f1").unwrap()),
                title: "FieldWork".to_string(),
            },
        )
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/a/./b//c/../d")),
            PathBuf::from("/a/b/d")
        );
        assert_eq!(
            normalize_lexically(Path::new("/../../x")),
            PathBuf::from("/x")
        );
    }

    #[test]
    fn test_backup_base_is_created_and_absolute() {
        let dir = TempDir::new().unwrap();
        let base = BackupBase::new(dir.path().join("nested/backups/./")).unwrap();
        assert!(base.path().is_absolute());
        assert!(base.path().is_dir());
        assert!(base.path().ends_with("nested/backups"));
    }

    #[test]
    fn test_resolve_empty_is_base() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        assert_eq!(sandbox.resolve("").unwrap(), sandbox.base().path());
        assert_eq!(sandbox.resolve(".").unwrap(), sandbox.base().path());
    }

    #[test]
    fn test_resolve_rejects_parent_escape() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        let err = sandbox.resolve("../../etc").unwrap_err();
        assert!(matches!(err, BackupError::PathTraversal { .. }));
    }

    #[test]
    fn test_resolve_rejects_sibling_prefix() {
        // "backups-evil" shares a string prefix with "backups" but is not inside it
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        assert!(sandbox.resolve("../backups-evil").is_err());
    }

    #[test]
    fn test_resolve_inner_parent_segments_stay_inside() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        let resolved = sandbox.resolve("a/b/../c").unwrap();
        assert_eq!(resolved, sandbox.base().path().join("a/c"));
    }

    #[test]
    fn test_resolve_destination_default_creates_dated_directory() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        let run_date = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();

        let destination = sandbox
            .resolve_destination(None, &roads(), run_date)
            .unwrap();

        assert_eq!(
            destination,
            sandbox.base().path().join("2026FEB11/FieldWork/layer/Roads")
        );
        assert!(destination.is_dir());
    }

    #[test]
    fn test_resolve_destination_blank_subpath_uses_default() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        let run_date = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();

        let destination = sandbox
            .resolve_destination(Some("   "), &roads(), run_date)
            .unwrap();
        assert!(destination.ends_with("2026FEB11/FieldWork/layer/Roads"));
    }

    #[test]
    fn test_resolve_destination_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        let run_date = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();

        let first = sandbox
            .resolve_destination(Some("team/nightly"), &roads(), run_date)
            .unwrap();
        let second = sandbox
            .resolve_destination(Some("team/nightly"), &roads(), run_date)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_destination_traversal_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        let run_date = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();

        let result = sandbox.resolve_destination(Some("../outside"), &roads(), run_date);
        assert!(matches!(result, Err(BackupError::PathTraversal { .. })));
        assert!(!dir.path().join("outside").exists());
    }
}
