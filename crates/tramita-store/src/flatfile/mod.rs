//! Flat-file record stores.
//!
//! Records live in an in-memory map loaded from a JSON file at startup.
//! Every mutation rewrites the whole file through a temp-file rename, so a
//! crash mid-write never leaves a truncated snapshot behind. Suited to the
//! single-process, small-caseload deployments this system targets.

mod case;
mod reminder;

pub use case::FlatFileCaseStore;
pub use reminder::FlatFileReminderStore;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;

use tramita_core::error::{AppError, ErrorKind};
use tramita_core::result::AppResult;

/// Load a snapshot file. A missing file is an empty store; a file that
/// exists but does not parse is a hard error, never silently discarded.
async fn read_snapshot<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read store file: {}", path.display()),
                e,
            ));
        }
    };
    serde_json::from_slice(&bytes).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Corrupt store file: {}", path.display()),
            e,
        )
    })
}

/// Write a snapshot atomically: serialize to a sibling temp file, then
/// rename over the target.
async fn write_snapshot<T: Serialize>(path: &Path, items: &[T]) -> AppResult<()> {
    let bytes = serde_json::to_vec_pretty(items)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to write store file: {}", tmp.display()),
            e,
        )
    })?;
    fs::rename(&tmp, path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to replace store file: {}", path.display()),
            e,
        )
    })
}
