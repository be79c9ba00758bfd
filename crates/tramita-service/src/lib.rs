//! # tramita-service
//!
//! Business logic over the record stores: case lifecycle, the document
//! category tracker, the payment ledger, the reminder registry, the pure
//! deadline & urgency calculator, and the dashboard projections built on
//! top of it.

pub mod cases;
pub mod dashboard;
pub mod deadline;
pub mod documents;
pub mod payments;
pub mod reminders;

use std::sync::Arc;

pub use cases::CaseService;
pub use dashboard::{DashboardService, ReadinessBuckets};
pub use documents::DocumentService;
pub use payments::PaymentService;
pub use reminders::ReminderService;

/// Shared handle to a case store backend.
pub type SharedCaseStore = Arc<dyn tramita_store::CaseStore>;
/// Shared handle to a reminder store backend.
pub type SharedReminderStore = Arc<dyn tramita_store::ReminderStore>;
/// Shared handle to a file storage backend.
pub type SharedFileStore = Arc<dyn tramita_core::traits::FileStore>;
