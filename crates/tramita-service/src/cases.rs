//! Case lifecycle service.

use chrono::Utc;
use tracing::{info, warn};

use tramita_core::error::AppError;
use tramita_core::result::AppResult;
use tramita_core::types::CaseId;
use tramita_entity::case::{Case, CasePatch, CaseTemplate, NewCase};

use crate::documents::template_patch;
use crate::{SharedCaseStore, SharedFileStore};

/// Service for case creation, lookup, update, submission, and deletion.
#[derive(Clone)]
pub struct CaseService {
    cases: SharedCaseStore,
    files: SharedFileStore,
}

impl CaseService {
    /// Create a new case service.
    pub fn new(cases: SharedCaseStore, files: SharedFileStore) -> Self {
        Self { cases, files }
    }

    /// Create a case, optionally copying its checklist (and cadence
    /// fields) from a template. The template is copied deeply; the case
    /// never references it live afterwards.
    pub async fn create(&self, draft: NewCase, template: Option<&CaseTemplate>) -> AppResult<Case> {
        let case = self.cases.create(draft).await?;
        let case = match template {
            Some(template) => self.cases.update(case.id, template_patch(template)).await?,
            None => case,
        };
        info!(case_id = %case.id, client = %case.full_name(), "Created case");
        Ok(case)
    }

    /// Fetch a case, failing with NotFound when absent.
    pub async fn get(&self, id: CaseId) -> AppResult<Case> {
        self.cases
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Case not found: {id}")))
    }

    /// List all cases, newest-created first.
    pub async fn list(&self) -> AppResult<Vec<Case>> {
        self.cases.list().await
    }

    /// Apply a partial update to a case.
    pub async fn update(&self, id: CaseId, patch: CasePatch) -> AppResult<Case> {
        self.cases.update(id, patch).await
    }

    /// Mark the case as filed with immigration, stamping the application
    /// date. Re-submission is a conflict; the application date is
    /// immutable once set.
    pub async fn submit_to_immigration(&self, id: CaseId) -> AppResult<Case> {
        let case = self.get(id).await?;
        if case.submitted_to_immigration {
            return Err(AppError::conflict(format!(
                "Case already submitted to immigration: {id}"
            )));
        }

        let patch = CasePatch {
            submitted_to_immigration: Some(true),
            application_date: Some(Some(Utc::now())),
            ..Default::default()
        };
        let case = self.cases.update(id, patch).await?;
        info!(case_id = %id, "Submitted case to immigration");
        Ok(case)
    }

    /// Delete a case, cascading to every file any of its document lists
    /// references. File deletions are best-effort; a missing file never
    /// blocks the record deletion. Returns false when the case was
    /// already gone.
    pub async fn delete(&self, id: CaseId) -> AppResult<bool> {
        let Some(case) = self.cases.get(id).await? else {
            return Ok(false);
        };

        for url in case.all_file_urls() {
            if let Err(e) = self.files.delete(&url).await {
                warn!(case_id = %id, url = %url, error = %e, "Failed to delete case file, continuing");
            }
        }

        let deleted = self.cases.delete(id).await?;
        info!(case_id = %id, "Deleted case");
        Ok(deleted)
    }
}
