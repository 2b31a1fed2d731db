//! Blob storage for persisted entities.
//!
//! The store is a flat key-value space of byte payloads. Keys are plain file
//! names; the file system implementation keeps one file per key under a
//! configured root directory.

mod blob;
mod error;

pub use blob::{BlobStore, FsBlobStore};
pub use error::{StorageError, StorageResult};
