//! Document category tracker.
//!
//! Every operation loads the case, mutates the affected list, and
//! persists through the store's merge update with a patch that replaces
//! only that list (plus any template-copied fields). Required documents
//! are fixed checklist slots (reset, never deleted); supplementary
//! documents are created, updated, or deleted outright; requested
//! documents track post-submission administrative requests.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use tramita_core::error::AppError;
use tramita_core::result::AppResult;
use tramita_core::traits::file_store::StoredFile;
use tramita_core::types::{CaseId, DocumentId};
use tramita_entity::case::{
    Case, CasePatch, CaseTemplate, NewRequestedDocument, NewSupplementaryDocument,
    RequestedDocument, RequiredDocument, SupplementaryCategory, SupplementaryDocument,
};

use crate::{SharedCaseStore, SharedFileStore};

/// Build the patch that copies a template onto a case: checklist rebuilt
/// in template order, cadence fields copied, template recorded.
pub(crate) fn template_patch(template: &CaseTemplate) -> CasePatch {
    let required_documents = template
        .required_documents
        .iter()
        .map(|doc| {
            let mut slot = RequiredDocument::new(&doc.code, &doc.name);
            slot.description = doc.description.clone();
            slot
        })
        .collect();

    CasePatch {
        required_documents: Some(required_documents),
        reminder_interval_days: Some(template.reminder_interval_days),
        administrative_silence_days: Some(template.administrative_silence_days),
        case_template_id: Some(Some(template.id)),
        ..Default::default()
    }
}

/// Service for all document-list mutations on a case.
#[derive(Clone)]
pub struct DocumentService {
    cases: SharedCaseStore,
    files: SharedFileStore,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(cases: SharedCaseStore, files: SharedFileStore) -> Self {
        Self { cases, files }
    }

    async fn load(&self, id: CaseId) -> AppResult<Case> {
        self.cases
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Case not found: {id}")))
    }

    /// Best-effort file cleanup: failures are logged and swallowed so the
    /// primary mutation never blocks on them.
    async fn discard_file(&self, case_id: CaseId, url: &str) {
        if let Err(e) = self.files.delete(url).await {
            warn!(case_id = %case_id, url = %url, error = %e, "Failed to delete file, continuing");
        }
    }

    /// Replace the case's checklist with the template's, copying the
    /// cadence fields. All slots start unsubmitted and non-optional.
    pub async fn assign_template(
        &self,
        case_id: CaseId,
        template: &CaseTemplate,
    ) -> AppResult<Case> {
        // Loading first keeps NotFound ahead of the update.
        let case = self.load(case_id).await?;
        for url in case
            .required_documents
            .iter()
            .filter_map(|d| d.file_url.as_deref())
        {
            self.discard_file(case_id, url).await;
        }

        let case = self.cases.update(case_id, template_patch(template)).await?;
        info!(case_id = %case_id, template = %template.name, "Assigned template");
        Ok(case)
    }

    /// Submit a file into a required checklist slot.
    pub async fn submit_required(
        &self,
        case_id: CaseId,
        code: &str,
        file: StoredFile,
    ) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.required_documents;
        let doc = docs
            .iter_mut()
            .find(|d| d.code == code)
            .ok_or_else(|| AppError::not_found(format!("Required document not found: {code}")))?;

        // A re-submission replaces the previous upload.
        if let Some(old) = doc.file_url.take() {
            self.discard_file(case_id, &old).await;
        }

        let file_name = file.file_name.clone();
        let file_size = file.size();
        let url = self.files.store(file).await?;

        doc.submitted = true;
        doc.file_url = Some(url);
        doc.uploaded_at = Some(Utc::now());
        doc.file_name = Some(file_name);
        doc.file_size = Some(file_size);

        let patch = CasePatch {
            required_documents: Some(docs),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Reset a required slot to the not-submitted state. The slot itself
    /// survives; its previous file is discarded.
    pub async fn reset_required(&self, case_id: CaseId, code: &str) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.required_documents;
        let doc = docs
            .iter_mut()
            .find(|d| d.code == code)
            .ok_or_else(|| AppError::not_found(format!("Required document not found: {code}")))?;

        if let Some(old) = doc.reset() {
            self.discard_file(case_id, &old).await;
        }

        let patch = CasePatch {
            required_documents: Some(docs),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Flip a single slot's optional flag. Submission state untouched.
    pub async fn toggle_optional(&self, case_id: CaseId, code: &str) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.required_documents;
        let doc = docs
            .iter_mut()
            .find(|d| d.code == code)
            .ok_or_else(|| AppError::not_found(format!("Required document not found: {code}")))?;
        doc.is_optional = !doc.is_optional;

        let patch = CasePatch {
            required_documents: Some(docs),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Set the optional flag on the selected slots.
    pub async fn set_optional(
        &self,
        case_id: CaseId,
        codes: &[String],
        optional: bool,
    ) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.required_documents;
        for doc in docs.iter_mut().filter(|d| codes.contains(&d.code)) {
            doc.is_optional = optional;
        }

        let patch = CasePatch {
            required_documents: Some(docs),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Mark every slot optional. Idempotent.
    pub async fn make_all_optional(&self, case_id: CaseId) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.required_documents;
        for doc in &mut docs {
            doc.is_optional = true;
        }

        let patch = CasePatch {
            required_documents: Some(docs),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Move one checklist slot, preserving all other relative ordering.
    pub async fn reorder_required(&self, case_id: CaseId, from: usize, to: usize) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.required_documents;
        if from >= docs.len() || to >= docs.len() {
            return Err(AppError::validation(format!(
                "Reorder out of range: {from} -> {to} with {} documents",
                docs.len()
            )));
        }
        let doc = docs.remove(from);
        docs.insert(to, doc);

        let patch = CasePatch {
            required_documents: Some(docs),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Add a supplementary document to one of the five lists. Without a
    /// file it is a placeholder; its reminder falls due `reminder_days`
    /// from now either way.
    pub async fn add_supplementary(
        &self,
        case_id: CaseId,
        category: SupplementaryCategory,
        input: NewSupplementaryDocument,
        file: Option<StoredFile>,
    ) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let now = Utc::now();

        let mut doc = SupplementaryDocument {
            id: DocumentId::new(),
            name: input.name,
            description: input.description,
            file_url: None,
            file_name: None,
            file_size: None,
            uploaded_at: None,
            uploaded_by: None,
            reminder_days: input.reminder_days,
            reminder_date: Some(now + Duration::days(input.reminder_days)),
        };
        if let Some(file) = file {
            let file_name = file.file_name.clone();
            let file_size = file.size();
            doc.file_url = Some(self.files.store(file).await?);
            doc.file_name = Some(file_name);
            doc.file_size = Some(file_size);
            doc.uploaded_at = Some(now);
        }

        let mut docs = case.supplementary(category).clone();
        docs.push(doc);
        self.cases
            .update(case_id, CasePatch::for_supplementary(category, docs))
            .await
    }

    /// Attach a file to an existing supplementary document: placeholder
    /// becomes fulfilled, or a re-upload replaces the prior file.
    pub async fn attach_file(
        &self,
        case_id: CaseId,
        category: SupplementaryCategory,
        doc_id: DocumentId,
        file: StoredFile,
        uploaded_by: Option<String>,
    ) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.supplementary(category).clone();
        let doc = docs.iter_mut().find(|d| d.id == doc_id).ok_or_else(|| {
            AppError::not_found(format!("Document not found in {category}: {doc_id}"))
        })?;

        if let Some(old) = doc.file_url.take() {
            self.discard_file(case_id, &old).await;
        }

        let file_name = file.file_name.clone();
        let file_size = file.size();
        doc.file_url = Some(self.files.store(file).await?);
        doc.file_name = Some(file_name);
        doc.file_size = Some(file_size);
        doc.uploaded_at = Some(Utc::now());
        doc.uploaded_by = uploaded_by;

        self.cases
            .update(case_id, CasePatch::for_supplementary(category, docs))
            .await
    }

    /// Delete a supplementary document and its file. Terminal, unlike a
    /// required-slot reset.
    pub async fn remove_supplementary(
        &self,
        case_id: CaseId,
        category: SupplementaryCategory,
        doc_id: DocumentId,
    ) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.supplementary(category).clone();
        let index = docs.iter().position(|d| d.id == doc_id).ok_or_else(|| {
            AppError::not_found(format!("Document not found in {category}: {doc_id}"))
        })?;

        let removed = docs.remove(index);
        if let Some(url) = removed.file_url {
            self.discard_file(case_id, &url).await;
        }

        self.cases
            .update(case_id, CasePatch::for_supplementary(category, docs))
            .await
    }

    /// Record a post-submission administrative request, stamped with the
    /// current time.
    pub async fn add_requested(
        &self,
        case_id: CaseId,
        input: NewRequestedDocument,
    ) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.requested_documents;
        if docs.iter().any(|d| d.code == input.code) {
            return Err(AppError::conflict(format!(
                "Requested document already exists: {}",
                input.code
            )));
        }

        docs.push(RequestedDocument {
            code: input.code,
            name: input.name,
            description: input.description,
            submitted: false,
            file_url: None,
            uploaded_at: None,
            requested_at: Some(Utc::now()),
        });

        let patch = CasePatch {
            requested_documents: Some(docs),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Submit a file answering a requested document.
    pub async fn submit_requested(
        &self,
        case_id: CaseId,
        code: &str,
        file: StoredFile,
    ) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.requested_documents;
        let doc = docs
            .iter_mut()
            .find(|d| d.code == code)
            .ok_or_else(|| AppError::not_found(format!("Requested document not found: {code}")))?;

        if let Some(old) = doc.file_url.take() {
            self.discard_file(case_id, &old).await;
        }

        doc.file_url = Some(self.files.store(file).await?);
        doc.submitted = true;
        doc.uploaded_at = Some(Utc::now());

        let patch = CasePatch {
            requested_documents: Some(docs),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Delete a requested-document entry and its file.
    pub async fn remove_requested(&self, case_id: CaseId, code: &str) -> AppResult<Case> {
        let case = self.load(case_id).await?;
        let mut docs = case.requested_documents;
        let index = docs
            .iter()
            .position(|d| d.code == code)
            .ok_or_else(|| AppError::not_found(format!("Requested document not found: {code}")))?;

        let removed = docs.remove(index);
        if let Some(url) = removed.file_url {
            self.discard_file(case_id, &url).await;
        }

        let patch = CasePatch {
            requested_documents: Some(docs),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Record that the requested-documents reminder was acted on now.
    /// Submission state is untouched.
    pub async fn mark_requested_reminded(&self, case_id: CaseId) -> AppResult<Case> {
        let patch = CasePatch {
            requested_documents_last_reminder_date: Some(Some(Utc::now())),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }
}
