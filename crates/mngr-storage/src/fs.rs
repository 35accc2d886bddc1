//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`], which maps logical paths onto files and
//! directories below a single data root.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{DirEntry, Page, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage confined to a data root.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use mngr_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("data"));
/// let listing = storage.list("")?;
/// ```
#[derive(Debug)]
pub struct FsStorage {
    /// Root directory every logical path is resolved against.
    root: PathBuf,
}

impl FsStorage {
    /// Create a storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve a logical path to a filesystem path under the root.
    ///
    /// Rejects paths containing parent directory components (`..`), absolute
    /// paths and platform prefixes, so nothing outside the root is reachable
    /// even if a caller skipped validation.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let logical = Path::new(path);
        let escapes = logical.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(logical)
                .with_backend(BACKEND));
        }
        Ok(self.root.join(logical))
    }

    fn io_error(err: std::io::Error, path: &str) -> StorageError {
        StorageError::io(err, Some(PathBuf::from(path))).with_backend(BACKEND)
    }
}

impl Storage for FsStorage {
    fn read_dir(&self, dir: &str) -> Result<Vec<DirEntry>, StorageError> {
        let full = self.resolve(dir)?;
        let entries = fs::read_dir(&full).map_err(|e| Self::io_error(e, dir))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::io_error(e, dir))?;
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            result.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }

        // read_dir order is platform-defined
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    fn load_page(&self, path: &str) -> Result<Page, StorageError> {
        let full = self.resolve(path)?;
        let body = fs::read(&full).map_err(|e| Self::io_error(e, path))?;
        tracing::debug!(path, bytes = body.len(), "Loaded page");
        Ok(Page::new(path, body))
    }

    fn save_page(&self, page: &Page) -> Result<(), StorageError> {
        let full = self.resolve(&page.path)?;
        fs::write(&full, &page.body).map_err(|e| Self::io_error(e, &page.path))?;
        tracing::debug!(path = %page.path, bytes = page.body.len(), "Saved page");
        Ok(())
    }

    fn create_folder(&self, path: &str) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        fs::create_dir(&full).map_err(|e| Self::io_error(e, path))?;
        tracing::debug!(path, "Created folder");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::Listing;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_fs_storage_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FsStorage>();
    }

    #[test]
    fn test_read_dir_sorted_with_kinds() {
        let temp = create_test_dir();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(temp.path().join("docs")).unwrap();

        let storage = FsStorage::new(temp.path().to_path_buf());
        let entries = storage.read_dir("").unwrap();

        assert_eq!(
            entries,
            vec![
                DirEntry::file("a.txt"),
                DirEntry::file("b.txt"),
                DirEntry::folder("docs"),
            ]
        );
    }

    #[test]
    fn test_list_skips_hidden_files() {
        let temp = create_test_dir();
        fs::write(temp.path().join(".secret"), "x").unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join("notes.txt"), "n").unwrap();
        fs::create_dir(temp.path().join("docs")).unwrap();

        let storage = FsStorage::new(temp.path().to_path_buf());
        let listing = storage.list("").unwrap();

        assert_eq!(
            listing,
            Listing {
                files: vec!["notes.txt".to_owned()],
                folders: vec!["docs".to_owned()],
            }
        );
    }

    #[test]
    fn test_list_nested_dir() {
        let temp = create_test_dir();
        fs::create_dir_all(temp.path().join("docs/drafts")).unwrap();
        fs::write(temp.path().join("docs/todo.txt"), "t").unwrap();

        let storage = FsStorage::new(temp.path().to_path_buf());
        let listing = storage.list("docs").unwrap();

        assert_eq!(listing.files, vec!["todo.txt"]);
        assert_eq!(listing.folders, vec!["drafts"]);
    }

    #[test]
    fn test_read_dir_missing_dir() {
        let temp = create_test_dir();
        let storage = FsStorage::new(temp.path().to_path_buf());

        let err = storage.read_dir("nope").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_load_existing_page() {
        let temp = create_test_dir();
        fs::create_dir(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs/todo.txt"), "buy milk").unwrap();

        let storage = FsStorage::new(temp.path().to_path_buf());
        let page = storage.load_page("docs/todo.txt").unwrap();

        assert_eq!(page, Page::new("docs/todo.txt", "buy milk"));
    }

    #[test]
    fn test_load_missing_page() {
        let temp = create_test_dir();
        let storage = FsStorage::new(temp.path().to_path_buf());

        let err = storage.load_page("missing.txt").unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = create_test_dir();
        let storage = FsStorage::new(temp.path().to_path_buf());

        storage
            .save_page(&Page::new("notes.txt", "first draft"))
            .unwrap();
        storage
            .save_page(&Page::new("notes.txt", "second draft"))
            .unwrap();

        let page = storage.load_page("notes.txt").unwrap();
        assert_eq!(page.body_text(), "second draft");
    }

    #[test]
    fn test_save_into_missing_folder_fails() {
        let temp = create_test_dir();
        let storage = FsStorage::new(temp.path().to_path_buf());

        let err = storage
            .save_page(&Page::new("nope/notes.txt", "x"))
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_folder() {
        let temp = create_test_dir();
        let storage = FsStorage::new(temp.path().to_path_buf());

        storage.create_folder("docs").unwrap();

        assert!(temp.path().join("docs").is_dir());
    }

    #[test]
    fn test_create_existing_folder_fails() {
        let temp = create_test_dir();
        fs::create_dir(temp.path().join("docs")).unwrap();
        let storage = FsStorage::new(temp.path().to_path_buf());

        let err = storage.create_folder("docs").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::AlreadyExists);
    }

    #[test]
    fn test_rejects_parent_dir_components() {
        let temp = create_test_dir();
        let storage = FsStorage::new(temp.path().join("root"));

        let err = storage.load_page("../outside.txt").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);

        let err = storage.read_dir("docs/../..").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);

        let err = storage
            .save_page(&Page::new("../escape.txt", "x"))
            .unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
        assert!(!temp.path().join("escape.txt").exists());
    }

    #[test]
    fn test_rejects_absolute_paths() {
        let temp = create_test_dir();
        let storage = FsStorage::new(temp.path().to_path_buf());

        let err = storage.create_folder("/tmp/elsewhere").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }
}
