//! Standalone reminder model.
//!
//! Reminders live in their own registry, independent of any case. The
//! optional `case_id` is a soft pointer used only to jump back to the
//! associated case; the reminder stays valid when that case is gone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use tramita_core::types::{CaseId, ReminderId};

/// Dashboard partition tag for a reminder.
///
/// Serialized as the legacy SCREAMING_SNAKE tags; anything absent or
/// unknown lands in the generic "Recordatorio" bucket. The urgency
/// aggregation is category-agnostic and never reads this field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderCategory {
    #[serde(rename = "APORTAR_DOCUMENTACION")]
    AportarDocumentacion,
    #[serde(rename = "REQUERIMIENTO")]
    Requerimiento,
    #[serde(rename = "RESOLUCION")]
    Resolucion,
    #[serde(rename = "JUSTIFICANTE_PRESENTACION")]
    JustificantePresentacion,
    #[serde(rename = "PAGOS")]
    Pagos,
    /// Generic "Recordatorio" bucket.
    #[default]
    #[serde(other, rename = "RECORDATORIO")]
    Uncategorized,
}

impl ReminderCategory {
    /// Return the category as its legacy tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AportarDocumentacion => "APORTAR_DOCUMENTACION",
            Self::Requerimiento => "REQUERIMIENTO",
            Self::Resolucion => "RESOLUCION",
            Self::JustificantePresentacion => "JUSTIFICANTE_PRESENTACION",
            Self::Pagos => "PAGOS",
            Self::Uncategorized => "RECORDATORIO",
        }
    }

    /// Parse a stored tag, mapping unknown or missing tags to the generic
    /// bucket.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("APORTAR_DOCUMENTACION") => Self::AportarDocumentacion,
            Some("REQUERIMIENTO") => Self::Requerimiento,
            Some("RESOLUCION") => Self::Resolucion,
            Some("JUSTIFICANTE_PRESENTACION") => Self::JustificantePresentacion,
            Some("PAGOS") => Self::Pagos,
            _ => Self::Uncategorized,
        }
    }
}

impl fmt::Display for ReminderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A standalone reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique reminder identifier.
    pub id: ReminderId,
    /// Soft pointer to the associated case, if any.
    #[serde(default)]
    pub case_id: Option<CaseId>,
    /// Client first name.
    pub client_name: String,
    /// Client surname.
    pub client_surname: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// When the reminder falls due.
    pub reminder_date: DateTime<Utc>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Dashboard partition tag.
    #[serde(default)]
    pub category: ReminderCategory,
    /// When the reminder was created.
    pub created_at: DateTime<Utc>,
    /// When the reminder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Build a fresh reminder from a draft, stamping identity and
    /// timestamps. The draft must have been validated first.
    pub fn from_draft(draft: NewReminder) -> Self {
        let now = Utc::now();
        Self {
            id: ReminderId::new(),
            case_id: draft.case_id,
            client_name: draft.client_name,
            client_surname: draft.client_surname,
            phone: draft.phone,
            reminder_date: draft.reminder_date,
            notes: draft.notes,
            category: draft.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full client name for display.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.client_name, self.client_surname)
    }
}

/// Draft for creating a reminder. Name, surname, and date are mandatory;
/// validation rejects the draft before any mutation happens.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewReminder {
    /// Soft pointer to the associated case, if any.
    #[serde(default)]
    pub case_id: Option<CaseId>,
    /// Client first name.
    #[validate(length(min = 1, message = "client name is required"))]
    pub client_name: String,
    /// Client surname.
    #[validate(length(min = 1, message = "client surname is required"))]
    pub client_surname: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// When the reminder falls due.
    pub reminder_date: DateTime<Utc>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Dashboard partition tag.
    #[serde(default)]
    pub category: ReminderCategory,
}

/// Partial update for a reminder; same merge semantics as `CasePatch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderPatch {
    pub case_id: Option<Option<CaseId>>,
    pub client_name: Option<String>,
    pub client_surname: Option<String>,
    pub phone: Option<Option<String>>,
    pub reminder_date: Option<DateTime<Utc>>,
    pub notes: Option<Option<String>>,
    pub category: Option<ReminderCategory>,
}

impl ReminderPatch {
    /// Apply the patch to a reminder. The store restamps `updated_at`.
    pub fn apply(self, reminder: &mut Reminder) {
        if let Some(v) = self.case_id {
            reminder.case_id = v;
        }
        if let Some(v) = self.client_name {
            reminder.client_name = v;
        }
        if let Some(v) = self.client_surname {
            reminder.client_surname = v;
        }
        if let Some(v) = self.phone {
            reminder.phone = v;
        }
        if let Some(v) = self.reminder_date {
            reminder.reminder_date = v;
        }
        if let Some(v) = self.notes {
            reminder.notes = v;
        }
        if let Some(v) = self.category {
            reminder.category = v;
        }
    }
}
