//! Case entity model.
//!
//! A case is the root aggregate: one client's immigration matter, carrying
//! the required-document checklist, five supplementary document lists, the
//! post-submission requested documents, the payment ledger, and every
//! deadline-relevant date.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tramita_core::types::{CaseId, TemplateId};

use super::document::{
    RequestedDocument, RequiredDocument, SupplementaryCategory, SupplementaryDocument,
};
use super::payment::PaymentLedger;

/// Default cadence for requested-document reminders, in days.
pub const DEFAULT_REQUESTED_REMINDER_INTERVAL_DAYS: i64 = 3;

/// A client's immigration case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    /// Unique case identifier.
    pub id: CaseId,
    /// Client first name.
    pub first_name: String,
    /// Client surname.
    pub last_name: String,
    /// Contact e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Template the checklist was copied from, if any.
    #[serde(default)]
    pub case_template_id: Option<TemplateId>,

    /// Fixed checklist slots, in insertion order.
    #[serde(default)]
    pub required_documents: Vec<RequiredDocument>,
    /// Freely added supporting documents.
    #[serde(default)]
    pub additional_documents: Vec<SupplementaryDocument>,
    /// "Aportar documentación" correspondence documents.
    #[serde(default)]
    pub aportar_documentacion: Vec<SupplementaryDocument>,
    /// "Requerimiento" correspondence documents.
    #[serde(default)]
    pub requerimiento: Vec<SupplementaryDocument>,
    /// "Resolución" correspondence documents.
    #[serde(default)]
    pub resolucion: Vec<SupplementaryDocument>,
    /// "Justificante de presentación" correspondence documents.
    #[serde(default)]
    pub justificante_presentacion: Vec<SupplementaryDocument>,
    /// Documents the administration requested after submission.
    #[serde(default)]
    pub requested_documents: Vec<RequestedDocument>,

    /// Payment ledger.
    #[serde(default)]
    pub payment: PaymentLedger,

    /// Whether the application has been filed with immigration.
    #[serde(default)]
    pub submitted_to_immigration: bool,
    /// Filing date; set when submitted and immutable thereafter for
    /// silence-timer purposes.
    #[serde(default)]
    pub application_date: Option<DateTime<Utc>>,
    /// Statutory administrative silence period in days.
    pub administrative_silence_days: i64,
    /// Checklist reminder cadence in days.
    pub reminder_interval_days: i64,
    /// Shared reminder cadence for requested documents, in days.
    #[serde(default = "default_requested_interval")]
    pub requested_documents_reminder_interval_days: i64,
    /// When the requested-document reminder was last acted on.
    #[serde(default)]
    pub requested_documents_last_reminder_date: Option<DateTime<Utc>>,
    /// How long the client has to answer a requested-document notice, in days.
    pub requested_documents_reminder_duration_days: i64,
    /// Optional payment reminder date feeding the urgent view.
    #[serde(default)]
    pub custom_reminder_date: Option<DateTime<Utc>>,

    /// When the case was created.
    pub created_at: DateTime<Utc>,
    /// When the case was last updated.
    pub updated_at: DateTime<Utc>,
}

fn default_requested_interval() -> i64 {
    DEFAULT_REQUESTED_REMINDER_INTERVAL_DAYS
}

impl Case {
    /// Build a fresh case from a draft, stamping identity and timestamps.
    pub fn from_draft(draft: NewCase) -> Self {
        let now = Utc::now();
        Self {
            id: CaseId::new(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            case_template_id: None,
            required_documents: Vec::new(),
            additional_documents: Vec::new(),
            aportar_documentacion: Vec::new(),
            requerimiento: Vec::new(),
            resolucion: Vec::new(),
            justificante_presentacion: Vec::new(),
            requested_documents: Vec::new(),
            payment: PaymentLedger::new(draft.total_fee.unwrap_or(0)),
            submitted_to_immigration: false,
            application_date: None,
            administrative_silence_days: draft.administrative_silence_days,
            reminder_interval_days: draft.reminder_interval_days,
            requested_documents_reminder_interval_days: DEFAULT_REQUESTED_REMINDER_INTERVAL_DAYS,
            requested_documents_last_reminder_date: None,
            requested_documents_reminder_duration_days: draft
                .requested_documents_reminder_duration_days,
            custom_reminder_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full client name for display.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Borrow the supplementary list for a category.
    pub fn supplementary(&self, category: SupplementaryCategory) -> &Vec<SupplementaryDocument> {
        match category {
            SupplementaryCategory::Additional => &self.additional_documents,
            SupplementaryCategory::AportarDocumentacion => &self.aportar_documentacion,
            SupplementaryCategory::Requerimiento => &self.requerimiento,
            SupplementaryCategory::Resolucion => &self.resolucion,
            SupplementaryCategory::JustificantePresentacion => &self.justificante_presentacion,
        }
    }

    /// Mutably borrow the supplementary list for a category.
    pub fn supplementary_mut(
        &mut self,
        category: SupplementaryCategory,
    ) -> &mut Vec<SupplementaryDocument> {
        match category {
            SupplementaryCategory::Additional => &mut self.additional_documents,
            SupplementaryCategory::AportarDocumentacion => &mut self.aportar_documentacion,
            SupplementaryCategory::Requerimiento => &mut self.requerimiento,
            SupplementaryCategory::Resolucion => &mut self.resolucion,
            SupplementaryCategory::JustificantePresentacion => &mut self.justificante_presentacion,
        }
    }

    /// Every file URL referenced by any document list, for cascade cleanup.
    pub fn all_file_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        urls.extend(
            self.required_documents
                .iter()
                .filter_map(|d| d.file_url.clone()),
        );
        for category in SupplementaryCategory::ALL {
            urls.extend(
                self.supplementary(category)
                    .iter()
                    .filter_map(|d| d.file_url.clone()),
            );
        }
        urls.extend(
            self.requested_documents
                .iter()
                .filter_map(|d| d.file_url.clone()),
        );
        urls
    }

    /// Count of mandatory checklist slots.
    pub fn mandatory_document_count(&self) -> usize {
        self.required_documents
            .iter()
            .filter(|d| !d.is_optional)
            .count()
    }

    /// Whether at least one mandatory checklist slot is still unsubmitted.
    pub fn has_pending_mandatory(&self) -> bool {
        self.required_documents
            .iter()
            .any(|d| d.is_pending_mandatory())
    }

    /// Whether at least one requested document is still pending.
    pub fn has_pending_requested(&self) -> bool {
        self.requested_documents.iter().any(|d| !d.submitted)
    }

    /// Invariant check: every submitted required document carries a file
    /// URL and an upload timestamp.
    pub fn required_invariant_holds(&self) -> bool {
        self.required_documents
            .iter()
            .all(|d| !d.submitted || (d.file_url.is_some() && d.uploaded_at.is_some()))
    }
}

/// Draft for creating a case. The checklist is copied from a template by
/// the case service, not carried on the draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCase {
    /// Client first name.
    pub first_name: String,
    /// Client surname.
    pub last_name: String,
    /// Contact e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Agreed total fee in euro-cents.
    #[serde(default)]
    pub total_fee: Option<i64>,
    /// Statutory silence period; overridden by the template when one is
    /// assigned.
    #[serde(default = "default_silence_days")]
    pub administrative_silence_days: i64,
    /// Checklist reminder cadence; overridden by the template when one is
    /// assigned.
    #[serde(default = "default_reminder_interval")]
    pub reminder_interval_days: i64,
    /// Requested-document answer window in days.
    #[serde(default = "default_requested_duration")]
    pub requested_documents_reminder_duration_days: i64,
}

fn default_silence_days() -> i64 {
    90
}

fn default_reminder_interval() -> i64 {
    7
}

fn default_requested_duration() -> i64 {
    10
}

/// Partial update for a case.
///
/// Whole-field merge semantics: a `Some` field replaces the stored field
/// entirely (list-valued fields wholesale, never diffed); a `None` field
/// is preserved. Nullable fields use a second `Option` level so they can
/// be explicitly cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CasePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub case_template_id: Option<Option<TemplateId>>,
    pub required_documents: Option<Vec<RequiredDocument>>,
    pub additional_documents: Option<Vec<SupplementaryDocument>>,
    pub aportar_documentacion: Option<Vec<SupplementaryDocument>>,
    pub requerimiento: Option<Vec<SupplementaryDocument>>,
    pub resolucion: Option<Vec<SupplementaryDocument>>,
    pub justificante_presentacion: Option<Vec<SupplementaryDocument>>,
    pub requested_documents: Option<Vec<RequestedDocument>>,
    pub payment: Option<PaymentLedger>,
    pub submitted_to_immigration: Option<bool>,
    pub application_date: Option<Option<DateTime<Utc>>>,
    pub administrative_silence_days: Option<i64>,
    pub reminder_interval_days: Option<i64>,
    pub requested_documents_reminder_interval_days: Option<i64>,
    pub requested_documents_last_reminder_date: Option<Option<DateTime<Utc>>>,
    pub requested_documents_reminder_duration_days: Option<i64>,
    pub custom_reminder_date: Option<Option<DateTime<Utc>>>,
}

impl CasePatch {
    /// Build a patch that replaces a single supplementary list.
    pub fn for_supplementary(
        category: SupplementaryCategory,
        docs: Vec<SupplementaryDocument>,
    ) -> Self {
        let mut patch = Self::default();
        match category {
            SupplementaryCategory::Additional => patch.additional_documents = Some(docs),
            SupplementaryCategory::AportarDocumentacion => {
                patch.aportar_documentacion = Some(docs)
            }
            SupplementaryCategory::Requerimiento => patch.requerimiento = Some(docs),
            SupplementaryCategory::Resolucion => patch.resolucion = Some(docs),
            SupplementaryCategory::JustificantePresentacion => {
                patch.justificante_presentacion = Some(docs)
            }
        }
        patch
    }

    /// Apply the patch to a case. Does not touch `id` or `created_at`;
    /// the store restamps `updated_at`.
    pub fn apply(self, case: &mut Case) {
        if let Some(v) = self.first_name {
            case.first_name = v;
        }
        if let Some(v) = self.last_name {
            case.last_name = v;
        }
        if let Some(v) = self.email {
            case.email = v;
        }
        if let Some(v) = self.phone {
            case.phone = v;
        }
        if let Some(v) = self.case_template_id {
            case.case_template_id = v;
        }
        if let Some(v) = self.required_documents {
            case.required_documents = v;
        }
        if let Some(v) = self.additional_documents {
            case.additional_documents = v;
        }
        if let Some(v) = self.aportar_documentacion {
            case.aportar_documentacion = v;
        }
        if let Some(v) = self.requerimiento {
            case.requerimiento = v;
        }
        if let Some(v) = self.resolucion {
            case.resolucion = v;
        }
        if let Some(v) = self.justificante_presentacion {
            case.justificante_presentacion = v;
        }
        if let Some(v) = self.requested_documents {
            case.requested_documents = v;
        }
        if let Some(v) = self.payment {
            case.payment = v;
        }
        if let Some(v) = self.submitted_to_immigration {
            case.submitted_to_immigration = v;
        }
        if let Some(v) = self.application_date {
            case.application_date = v;
        }
        if let Some(v) = self.administrative_silence_days {
            case.administrative_silence_days = v;
        }
        if let Some(v) = self.reminder_interval_days {
            case.reminder_interval_days = v;
        }
        if let Some(v) = self.requested_documents_reminder_interval_days {
            case.requested_documents_reminder_interval_days = v;
        }
        if let Some(v) = self.requested_documents_last_reminder_date {
            case.requested_documents_last_reminder_date = v;
        }
        if let Some(v) = self.requested_documents_reminder_duration_days {
            case.requested_documents_reminder_duration_days = v;
        }
        if let Some(v) = self.custom_reminder_date {
            case.custom_reminder_date = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::document::RequiredDocument;

    fn sample_case() -> Case {
        Case::from_draft(NewCase {
            first_name: "Amina".into(),
            last_name: "Diallo".into(),
            email: Some("amina@example.com".into()),
            phone: None,
            total_fee: Some(120_000),
            administrative_silence_days: 90,
            reminder_interval_days: 7,
            requested_documents_reminder_duration_days: 10,
        })
    }

    #[test]
    fn test_patch_replaces_present_fields_only() {
        let mut case = sample_case();
        let original_email = case.email.clone();

        let patch = CasePatch {
            first_name: Some("Aminata".into()),
            required_documents: Some(vec![RequiredDocument::new("nie", "NIE")]),
            ..Default::default()
        };
        patch.apply(&mut case);

        assert_eq!(case.first_name, "Aminata");
        assert_eq!(case.required_documents.len(), 1);
        // Absent fields are preserved.
        assert_eq!(case.email, original_email);
        assert_eq!(case.last_name, "Diallo");
    }

    #[test]
    fn test_patch_clears_nullable_field() {
        let mut case = sample_case();
        case.custom_reminder_date = Some(Utc::now());

        let patch = CasePatch {
            custom_reminder_date: Some(None),
            ..Default::default()
        };
        patch.apply(&mut case);
        assert!(case.custom_reminder_date.is_none());
    }

    #[test]
    fn test_list_fields_replaced_wholesale() {
        let mut case = sample_case();
        case.required_documents = vec![
            RequiredDocument::new("a", "A"),
            RequiredDocument::new("b", "B"),
        ];

        let patch = CasePatch {
            required_documents: Some(vec![RequiredDocument::new("c", "C")]),
            ..Default::default()
        };
        patch.apply(&mut case);
        assert_eq!(case.required_documents.len(), 1);
        assert_eq!(case.required_documents[0].code, "c");
    }

    #[test]
    fn test_all_file_urls_walks_every_list() {
        let mut case = sample_case();
        let mut doc = RequiredDocument::new("nie", "NIE");
        doc.submitted = true;
        doc.file_url = Some("/files/1".into());
        doc.uploaded_at = Some(Utc::now());
        case.required_documents.push(doc);
        case.requerimiento.push(SupplementaryDocument {
            id: tramita_core::types::DocumentId::new(),
            name: "Notice".into(),
            description: None,
            file_url: Some("/files/2".into()),
            file_name: None,
            file_size: None,
            uploaded_at: None,
            uploaded_by: None,
            reminder_days: 5,
            reminder_date: None,
        });

        let urls = case.all_file_urls();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains(&"/files/1".to_string()));
        assert!(urls.contains(&"/files/2".to_string()));
    }

    #[test]
    fn test_required_invariant() {
        let mut case = sample_case();
        let mut doc = RequiredDocument::new("nie", "NIE");
        doc.submitted = true;
        case.required_documents.push(doc);
        assert!(!case.required_invariant_holds());

        case.required_documents[0].file_url = Some("/files/1".into());
        case.required_documents[0].uploaded_at = Some(Utc::now());
        assert!(case.required_invariant_holds());
    }
}
