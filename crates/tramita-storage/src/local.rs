//! Local filesystem file store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use tramita_core::config::storage::StorageConfig;
use tramita_core::error::{AppError, ErrorKind};
use tramita_core::result::AppResult;
use tramita_core::traits::file_store::{FileStore, StoredFile};

/// Local filesystem file store.
///
/// Files are written under a root directory with a UUID-prefixed name so
/// repeated uploads of the same client file never collide. The returned
/// `file_url` is `{base_url}/{stored_name}`.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    /// Root directory for all stored files.
    root: PathBuf,
    /// Public URL prefix stored files are addressed by.
    base_url: String,
}

impl LocalFileStore {
    /// Create a new local file store from configuration.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a file URL back to its path under the root.
    ///
    /// Returns `None` for URLs that were not issued by this store.
    fn resolve(&self, file_url: &str) -> Option<PathBuf> {
        let name = file_url
            .strip_prefix(&self.base_url)?
            .trim_start_matches('/');
        // Stored names are flat; reject anything path-like.
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return None;
        }
        Some(self.root.join(name))
    }

    /// Derive a collision-free stored name from the client file name.
    fn stored_name(suggested: &str) -> String {
        let safe: String = Path::new(suggested)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if safe.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            format!("{}-{}", Uuid::new_v4(), safe)
        }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, file: StoredFile) -> AppResult<String> {
        let name = Self::stored_name(&file.file_name);
        let path = self.root.join(&name);

        fs::write(&path, &file.bytes).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {}", path.display()),
                e,
            )
        })?;

        debug!(name = %name, bytes = file.bytes.len(), "Stored file");
        Ok(format!("{}/{}", self.base_url, name))
    }

    async fn delete(&self, file_url: &str) -> AppResult<()> {
        let Some(path) = self.resolve(file_url) else {
            // Foreign or malformed URL; nothing to delete here.
            return Ok(());
        };
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(url = file_url, "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {file_url}"),
                e,
            )),
        }
    }

    async fn exists(&self, file_url: &str) -> AppResult<bool> {
        match self.resolve(file_url) {
            Some(path) => Ok(path.exists()),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    async fn store_in(dir: &tempfile::TempDir) -> LocalFileStore {
        let config = StorageConfig {
            root: dir.path().to_string_lossy().into_owned(),
            base_url: "/files".into(),
        };
        LocalFileStore::new(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_store_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let url = store
            .store(StoredFile::new(Bytes::from("hello"), "passport.pdf"))
            .await
            .unwrap();
        assert!(url.starts_with("/files/"));
        assert!(url.ends_with("passport.pdf"));
        assert!(store.exists(&url).await.unwrap());

        store.delete(&url).await.unwrap();
        assert!(!store.exists(&url).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let url = store
            .store(StoredFile::new(Bytes::from("x"), "a.txt"))
            .await
            .unwrap();
        store.delete(&url).await.unwrap();
        // Second delete of the same URL still succeeds.
        store.delete(&url).await.unwrap();
        // As does deleting a URL that never existed.
        store.delete("/files/never-there.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_same_name_does_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let a = store
            .store(StoredFile::new(Bytes::from("one"), "nie.pdf"))
            .await
            .unwrap();
        let b = store
            .store(StoredFile::new(Bytes::from("two"), "nie.pdf"))
            .await
            .unwrap();
        assert_ne!(a, b);
        assert!(store.exists(&a).await.unwrap());
        assert!(store.exists(&b).await.unwrap());
    }

    #[tokio::test]
    async fn test_foreign_url_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        assert!(!store.exists("https://elsewhere/x.pdf").await.unwrap());
        store.delete("https://elsewhere/x.pdf").await.unwrap();
    }

    #[test]
    fn test_stored_name_sanitizes() {
        let name = LocalFileStore::stored_name("../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }
}
