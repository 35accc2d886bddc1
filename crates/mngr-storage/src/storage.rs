//! Storage trait, page model and error types.
//!
//! Provides the core [`Storage`] trait for reading and writing pages, along with
//! [`StorageError`] for unified error handling across backends.
//!
//! # Logical Path Convention
//!
//! All path parameters in Storage methods are **logical paths** relative to the
//! data root, never filesystem paths:
//! - `""` - the data root itself
//! - `"notes.txt"` - a page at the root
//! - `"docs"` - a folder
//! - `"docs/todo.txt"` - a nested page
//!
//! Callers are expected to pass paths that were already validated; backends
//! still refuse anything that would leave the root.

use std::path::PathBuf;

use serde::Serialize;

/// In-memory content of one stored file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Logical path (e.g., "docs/todo.txt").
    pub path: String,
    /// Raw file content.
    pub body: Vec<u8>,
}

impl Page {
    /// Create a page that is not backed by storage yet.
    #[must_use]
    pub fn new(path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Body as UTF-8 text, or an error if any byte sequence is invalid.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}

/// Raw directory entry as returned by [`Storage::read_dir`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name (no path separators).
    pub name: String,
    /// True if the entry is a directory.
    pub is_dir: bool,
}

impl DirEntry {
    /// Entry for a regular file.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    /// Entry for a directory.
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    /// Hidden entries start with a dot.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Directory content split into files and folders.
///
/// Hidden entries are never part of a listing. Both sequences keep the order
/// of the entries they were built from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Names of regular files.
    pub files: Vec<String>,
    /// Names of sub-directories.
    pub folders: Vec<String>,
}

impl Listing {
    /// Build a listing from raw entries, dropping hidden ones.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = DirEntry>) -> Self {
        let mut listing = Self::default();
        for entry in entries {
            if entry.name.is_empty() || entry.is_hidden() {
                continue;
            }
            if entry.is_dir {
                listing.folders.push(entry.name);
            } else {
                listing.files.push(entry.name);
            }
        }
        listing
    }

    /// True if there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Resource already exists (for create operations).
    AlreadyExists,
    /// Invalid path or identifier.
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// True if the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::AlreadyExists => "Already exists",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for pages and folders under a single data root.
///
/// Implementations are shared across concurrent requests and must not rely on
/// any per-request state. No coordination is performed between writers: two
/// saves to the same path race and the last one wins.
pub trait Storage: Send + Sync {
    /// Read the raw entries of a directory.
    ///
    /// # Arguments
    ///
    /// * `dir` - Logical directory path ("" for the data root)
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory doesn't exist or can't be read.
    fn read_dir(&self, dir: &str) -> Result<Vec<DirEntry>, StorageError>;

    /// Load a page.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with [`StorageErrorKind::NotFound`] if there is
    /// no page at `path`, or another kind if it can't be read.
    fn load_page(&self, path: &str) -> Result<Page, StorageError>;

    /// Persist a page, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the page can't be written.
    fn save_page(&self, page: &Page) -> Result<(), StorageError>;

    /// Create a new folder.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the folder already exists, its parent is
    /// missing, or it can't be created.
    fn create_folder(&self, path: &str) -> Result<(), StorageError>;

    /// List a directory as files and folders, without hidden entries.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Storage::read_dir`].
    fn list(&self, dir: &str) -> Result<Listing, StorageError> {
        Ok(Listing::from_entries(self.read_dir(dir)?))
    }
}
