//! Page storage for the mngr editor.
//!
//! This crate provides a [`Storage`] trait for reading and writing pages and
//! folders below a single data root. This enables:
//!
//! - **Unit testing** of request handlers without touching the real filesystem
//! - **Clean separation** between HTTP handling and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `read_dir()`, `list()`, `load_page()`, `save_page()`
//!   and `create_folder()`
//! - [`FsStorage`] implementation for a local data directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mngr_storage::{FsStorage, Page, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("data"));
//! storage.save_page(&Page::new("notes.txt", "hello"))?;
//! let listing = storage.list("")?;
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{
    DirEntry, Listing, Page, Storage, StorageError, StorageErrorKind,
};
