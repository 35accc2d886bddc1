//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use crate::storage::{DirEntry, Page, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Split a logical path into its parent directory and final name.
fn split_path(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}

/// Mock storage for testing.
///
/// Keeps pages and folders in memory. The data root always exists. Use the
/// builder methods to configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use mngr_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_folder("docs")
///     .with_page("docs/todo.txt", "buy milk");
///
/// let page = storage.load_page("docs/todo.txt").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    pages: RwLock<BTreeMap<String, Vec<u8>>>,
    folders: RwLock<BTreeSet<String>>,
    fail_writes: bool,
    fail_reads: bool,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a folder.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_folder(self, path: impl Into<String>) -> Self {
        self.folders.write().unwrap().insert(path.into());
        self
    }

    /// Add a page with the given content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.pages.write().unwrap().insert(path.into(), body.into());
        self
    }

    /// Make every write operation fail with a permission error.
    #[must_use]
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Make every read operation fail with a permission error.
    #[must_use]
    pub fn with_failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Raw page content, if present.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page_body(&self, path: &str) -> Option<Vec<u8>> {
        self.pages.read().unwrap().get(path).cloned()
    }

    /// True if a folder exists at `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn has_folder(&self, path: &str) -> bool {
        path.is_empty() || self.folders.read().unwrap().contains(path)
    }

    fn denied(path: &str) -> StorageError {
        StorageError::new(StorageErrorKind::PermissionDenied)
            .with_path(path)
            .with_backend(BACKEND)
    }

    fn not_found(path: &str) -> StorageError {
        StorageError::not_found(path).with_backend(BACKEND)
    }
}

impl Storage for MockStorage {
    fn read_dir(&self, dir: &str) -> Result<Vec<DirEntry>, StorageError> {
        if self.fail_reads {
            return Err(Self::denied(dir));
        }
        if !self.has_folder(dir) {
            return Err(Self::not_found(dir));
        }

        let mut entries: Vec<DirEntry> = self
            .folders
            .read()
            .unwrap()
            .iter()
            .filter(|f| split_path(f).0 == dir)
            .map(|f| DirEntry::folder(split_path(f).1))
            .collect();
        entries.extend(
            self.pages
                .read()
                .unwrap()
                .keys()
                .filter(|p| split_path(p).0 == dir)
                .map(|p| DirEntry::file(split_path(p).1)),
        );
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn load_page(&self, path: &str) -> Result<Page, StorageError> {
        if self.fail_reads {
            return Err(Self::denied(path));
        }
        self.page_body(path)
            .map(|body| Page::new(path, body))
            .ok_or_else(|| Self::not_found(path))
    }

    fn save_page(&self, page: &Page) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(Self::denied(&page.path));
        }
        if !self.has_folder(split_path(&page.path).0) {
            return Err(Self::not_found(&page.path));
        }
        self.pages
            .write()
            .unwrap()
            .insert(page.path.clone(), page.body.clone());
        Ok(())
    }

    fn create_folder(&self, path: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(Self::denied(path));
        }
        if !self.has_folder(split_path(path).0) {
            return Err(Self::not_found(path));
        }
        if self.has_folder(path) {
            return Err(StorageError::new(StorageErrorKind::AlreadyExists)
                .with_path(path)
                .with_backend(BACKEND));
        }
        self.folders.write().unwrap().insert(path.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("a.txt"), ("", "a.txt"));
        assert_eq!(split_path("docs/a.txt"), ("docs", "a.txt"));
        assert_eq!(split_path("docs/sub/a.txt"), ("docs/sub", "a.txt"));
    }

    #[test]
    fn test_read_dir_lists_direct_children_only() {
        let storage = MockStorage::new()
            .with_folder("docs")
            .with_folder("docs/sub")
            .with_page("root.txt", "r")
            .with_page("docs/a.txt", "a")
            .with_page("docs/sub/deep.txt", "d");

        assert_eq!(
            storage.read_dir("").unwrap(),
            vec![DirEntry::folder("docs"), DirEntry::file("root.txt")]
        );
        assert_eq!(
            storage.read_dir("docs").unwrap(),
            vec![DirEntry::file("a.txt"), DirEntry::folder("sub")]
        );
    }

    #[test]
    fn test_read_dir_missing_folder() {
        let storage = MockStorage::new();

        assert!(storage.read_dir("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_save_and_load() {
        let storage = MockStorage::new();

        storage.save_page(&Page::new("a.txt", "hello")).unwrap();

        assert_eq!(storage.load_page("a.txt").unwrap().body_text(), "hello");
    }

    #[test]
    fn test_save_requires_parent_folder() {
        let storage = MockStorage::new();

        let err = storage.save_page(&Page::new("docs/a.txt", "x")).unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_folder_twice_fails() {
        let storage = MockStorage::new();

        storage.create_folder("docs").unwrap();
        let err = storage.create_folder("docs").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::AlreadyExists);
    }

    #[test]
    fn test_failing_writes() {
        let storage = MockStorage::new().with_failing_writes();

        let err = storage.save_page(&Page::new("a.txt", "x")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
        assert!(storage.page_body("a.txt").is_none());
    }

    #[test]
    fn test_failing_reads() {
        let storage = MockStorage::new()
            .with_page("a.txt", "x")
            .with_failing_reads();

        assert_eq!(
            storage.load_page("a.txt").unwrap_err().kind,
            StorageErrorKind::PermissionDenied
        );
        assert_eq!(
            storage.list("").unwrap_err().kind,
            StorageErrorKind::PermissionDenied
        );
    }
}
