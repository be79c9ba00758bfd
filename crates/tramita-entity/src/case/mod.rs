//! Case domain entities.

pub mod document;
pub mod model;
pub mod payment;
pub mod template;

pub use document::{
    NewRequestedDocument, NewSupplementaryDocument, RequestedDocument, RequiredDocument,
    SupplementaryCategory, SupplementaryDocument,
};
pub use model::{Case, CasePatch, NewCase};
pub use payment::{PaymentEntry, PaymentLedger};
pub use template::{CaseTemplate, TemplateDocument};
