//! Document entries tracked on a case.
//!
//! Three closed variants instead of a dynamic property bag: required
//! checklist slots, freely added supplementary documents, and
//! post-submission requested documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use tramita_core::types::DocumentId;

/// A fixed-slot checklist item defined by the case's template.
///
/// Required documents are never deleted from the list; removal only resets
/// them to the not-submitted state. `submitted == true` implies both
/// `file_url` and `uploaded_at` are set. List order is insertion order and
/// is significant (the checklist supports drag-reorder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredDocument {
    /// Slot code, unique within a case.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether a file has been submitted for this slot.
    pub submitted: bool,
    /// URL of the submitted file.
    #[serde(default)]
    pub file_url: Option<String>,
    /// When the file was uploaded.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Original file name of the upload.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Upload size in bytes.
    #[serde(default)]
    pub file_size: Option<i64>,
    /// Whether the slot is optional for readiness purposes.
    #[serde(default)]
    pub is_optional: bool,
}

impl RequiredDocument {
    /// Create an empty, not-submitted slot.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            submitted: false,
            file_url: None,
            uploaded_at: None,
            file_name: None,
            file_size: None,
            is_optional: false,
        }
    }

    /// Reset the slot to the not-submitted state, returning the previous
    /// file URL (for cleanup).
    pub fn reset(&mut self) -> Option<String> {
        self.submitted = false;
        self.uploaded_at = None;
        self.file_name = None;
        self.file_size = None;
        self.file_url.take()
    }

    /// Whether the slot still blocks submission readiness.
    pub fn is_pending_mandatory(&self) -> bool {
        !self.is_optional && !self.submitted
    }
}

/// A freely added document: either an "additional" document or one of the
/// four administrative correspondence categories.
///
/// Unlike a required document it may exist with no file at all (a
/// placeholder to be fulfilled later) and is never reset, only created,
/// updated, or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplementaryDocument {
    /// Unique document identifier.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// URL of the attached file, if any.
    #[serde(default)]
    pub file_url: Option<String>,
    /// Original file name of the attachment.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Attachment size in bytes.
    #[serde(default)]
    pub file_size: Option<i64>,
    /// When the file was attached.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Who attached the file.
    #[serde(default)]
    pub uploaded_by: Option<String>,
    /// Per-document reminder lead time in days.
    pub reminder_days: i64,
    /// When the document's reminder falls due.
    #[serde(default)]
    pub reminder_date: Option<DateTime<Utc>>,
}

impl SupplementaryDocument {
    /// Whether the document is still a placeholder with no file.
    pub fn is_placeholder(&self) -> bool {
        self.file_url.is_none()
    }
}

/// Input for creating a supplementary document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSupplementaryDocument {
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Per-document reminder lead time in days.
    pub reminder_days: i64,
}

/// A document the administration requested after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedDocument {
    /// Slot code, unique within a case.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether a file has been submitted for this request.
    pub submitted: bool,
    /// URL of the submitted file.
    #[serde(default)]
    pub file_url: Option<String>,
    /// When the file was uploaded.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    /// When the administration requested the document. Absent on legacy
    /// records; deadline derivation falls back to the application date.
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
}

/// Input for creating a requested document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequestedDocument {
    /// Slot code, unique within a case.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Which of the five supplementary document lists an operation targets.
///
/// The four correspondence categories are structurally identical to the
/// additional-documents list; they differ only by which named list they
/// live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplementaryCategory {
    /// Freely added supporting documents.
    Additional,
    /// Documentation the client must provide ("aportar documentación").
    AportarDocumentacion,
    /// Administrative requirement notices ("requerimiento").
    Requerimiento,
    /// Resolutions received ("resolución").
    Resolucion,
    /// Proof-of-submission receipts ("justificante de presentación").
    JustificantePresentacion,
}

impl SupplementaryCategory {
    /// All categories, in dashboard order.
    pub const ALL: [Self; 5] = [
        Self::Additional,
        Self::AportarDocumentacion,
        Self::Requerimiento,
        Self::Resolucion,
        Self::JustificantePresentacion,
    ];

    /// Return the category as its snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Additional => "additional",
            Self::AportarDocumentacion => "aportar_documentacion",
            Self::Requerimiento => "requerimiento",
            Self::Resolucion => "resolucion",
            Self::JustificantePresentacion => "justificante_presentacion",
        }
    }
}

impl fmt::Display for SupplementaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SupplementaryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "additional" => Ok(Self::Additional),
            "aportar_documentacion" => Ok(Self::AportarDocumentacion),
            "requerimiento" => Ok(Self::Requerimiento),
            "resolucion" => Ok(Self::Resolucion),
            "justificante_presentacion" => Ok(Self::JustificantePresentacion),
            other => Err(format!("unknown document category '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_file_fields() {
        let mut doc = RequiredDocument::new("passport", "Passport");
        doc.submitted = true;
        doc.file_url = Some("/files/abc".into());
        doc.uploaded_at = Some(Utc::now());
        doc.file_name = Some("passport.pdf".into());
        doc.file_size = Some(1024);

        let old = doc.reset();
        assert_eq!(old.as_deref(), Some("/files/abc"));
        assert!(!doc.submitted);
        assert!(doc.file_url.is_none());
        assert!(doc.uploaded_at.is_none());
        assert!(doc.file_name.is_none());
        assert!(doc.file_size.is_none());
        // The slot itself survives.
        assert_eq!(doc.code, "passport");
    }

    #[test]
    fn test_category_roundtrip() {
        for cat in SupplementaryCategory::ALL {
            let parsed: SupplementaryCategory = cat.as_str().parse().expect("parse");
            assert_eq!(parsed, cat);
        }
        assert!("nonsense".parse::<SupplementaryCategory>().is_err());
    }

    #[test]
    fn test_placeholder_detection() {
        let doc = SupplementaryDocument {
            id: DocumentId::new(),
            name: "Padron".into(),
            description: None,
            file_url: None,
            file_name: None,
            file_size: None,
            uploaded_at: None,
            uploaded_by: None,
            reminder_days: 5,
            reminder_date: None,
        };
        assert!(doc.is_placeholder());
    }
}
