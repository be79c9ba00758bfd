//! Case template collaborator input.
//!
//! Templates are consumed once, at case creation or template reassignment,
//! and copied deeply onto the case. The case never references the template
//! live afterwards.

use serde::{Deserialize, Serialize};

use tramita_core::types::TemplateId;

/// One required-document slot defined by a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDocument {
    /// Slot code, unique within the template.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A read-only case template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseTemplate {
    /// Template identifier.
    pub id: TemplateId,
    /// Template name (e.g. "Arraigo social").
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Checklist slots, in template order.
    pub required_documents: Vec<TemplateDocument>,
    /// Checklist reminder cadence copied onto new cases.
    pub reminder_interval_days: i64,
    /// Statutory administrative silence period copied onto new cases.
    pub administrative_silence_days: i64,
}
