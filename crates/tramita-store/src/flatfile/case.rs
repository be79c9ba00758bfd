//! Flat-file case store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::info;

use tramita_core::error::{AppError, ErrorKind};
use tramita_core::result::AppResult;
use tramita_core::traits::RecordStore;
use tramita_core::types::CaseId;
use tramita_entity::case::{Case, CasePatch, NewCase};

/// Flat-file case store backed by `cases.json` in the data directory.
#[derive(Debug)]
pub struct FlatFileCaseStore {
    path: PathBuf,
    cases: RwLock<HashMap<CaseId, Case>>,
}

impl FlatFileCaseStore {
    /// Open the store, loading any existing snapshot from the data
    /// directory.
    pub async fn open(data_dir: impl AsRef<Path>) -> AppResult<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create data directory: {}", data_dir.display()),
                e,
            )
        })?;

        let path = data_dir.join("cases.json");
        let loaded: Vec<Case> = super::read_snapshot(&path).await?;
        info!(count = loaded.len(), path = %path.display(), "Loaded case store");

        let cases = loaded.into_iter().map(|c| (c.id, c)).collect();
        Ok(Self {
            path,
            cases: RwLock::new(cases),
        })
    }

    /// Rewrite the snapshot from the given map state. Caller holds the
    /// write lock, so the snapshot is consistent with what readers see.
    async fn persist(&self, cases: &HashMap<CaseId, Case>) -> AppResult<()> {
        let mut items: Vec<&Case> = cases.values().collect();
        // Stable file layout keeps snapshots diffable.
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        super::write_snapshot(&self.path, &items).await
    }
}

#[async_trait]
impl RecordStore<CaseId, NewCase, CasePatch, Case> for FlatFileCaseStore {
    async fn create(&self, draft: NewCase) -> AppResult<Case> {
        let case = Case::from_draft(draft);
        let mut cases = self.cases.write().await;
        cases.insert(case.id, case.clone());
        self.persist(&cases).await?;
        Ok(case)
    }

    async fn get(&self, id: CaseId) -> AppResult<Option<Case>> {
        Ok(self.cases.read().await.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Case>> {
        let cases = self.cases.read().await;
        let mut items: Vec<Case> = cases.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn update(&self, id: CaseId, patch: CasePatch) -> AppResult<Case> {
        let mut cases = self.cases.write().await;
        let case = cases
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Case not found: {id}")))?;
        patch.apply(case);
        case.updated_at = Utc::now();
        let updated = case.clone();
        self.persist(&cases).await?;
        Ok(updated)
    }

    async fn delete(&self, id: CaseId) -> AppResult<bool> {
        let mut cases = self.cases.write().await;
        if cases.remove(&id).is_none() {
            return Ok(false);
        }
        self.persist(&cases).await?;
        Ok(true)
    }
}
