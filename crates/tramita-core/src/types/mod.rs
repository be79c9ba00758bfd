//! Shared value types.

pub mod id;

pub use id::{CaseId, DocumentId, ReminderId, TemplateId};
