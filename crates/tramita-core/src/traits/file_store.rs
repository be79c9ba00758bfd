//! File-storage collaborator trait.
//!
//! Document bytes live outside the record store. The engine only ever
//! holds opaque `file_url` strings handed out by a [`FileStore`]; the
//! trait is defined here in `tramita-core` and implemented in
//! `tramita-storage`.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// An incoming file to be persisted alongside a document entry.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Raw file contents.
    pub bytes: Bytes,
    /// Original client-side file name, used to derive the stored name.
    pub file_name: String,
}

impl StoredFile {
    /// Create a new stored-file payload.
    pub fn new(bytes: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> i64 {
        self.bytes.len() as i64
    }
}

/// Trait for file storage backends.
///
/// `delete` is idempotent: deleting a URL whose file is already absent
/// succeeds. Callers treat deletion as best-effort cleanup and must never
/// fail a primary mutation because of it.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist the given bytes and return the file URL to reference them by.
    async fn store(&self, file: StoredFile) -> AppResult<String>;

    /// Delete the file referenced by the given URL, tolerating a missing file.
    async fn delete(&self, file_url: &str) -> AppResult<()>;

    /// Check whether a file exists for the given URL.
    async fn exists(&self, file_url: &str) -> AppResult<bool>;
}
