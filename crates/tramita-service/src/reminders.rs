//! Standalone reminder registry service.

use tracing::info;
use validator::Validate;

use tramita_core::error::AppError;
use tramita_core::result::AppResult;
use tramita_core::types::ReminderId;
use tramita_entity::case::Case;
use tramita_entity::reminder::{NewReminder, Reminder, ReminderCategory, ReminderPatch};

use crate::{SharedCaseStore, SharedReminderStore};

/// Dashboard partition order for reminder categories.
const CATEGORY_ORDER: [ReminderCategory; 6] = [
    ReminderCategory::AportarDocumentacion,
    ReminderCategory::Requerimiento,
    ReminderCategory::Resolucion,
    ReminderCategory::JustificantePresentacion,
    ReminderCategory::Pagos,
    ReminderCategory::Uncategorized,
];

/// Service for standalone reminders.
#[derive(Clone)]
pub struct ReminderService {
    reminders: SharedReminderStore,
    cases: SharedCaseStore,
}

impl ReminderService {
    /// Create a new reminder service.
    pub fn new(reminders: SharedReminderStore, cases: SharedCaseStore) -> Self {
        Self { reminders, cases }
    }

    /// Create a reminder. The draft is validated before any mutation:
    /// missing name or surname is rejected cleanly.
    pub async fn create(&self, draft: NewReminder) -> AppResult<Reminder> {
        draft
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        let reminder = self.reminders.create(draft).await?;
        info!(reminder_id = %reminder.id, client = %reminder.full_name(), "Created reminder");
        Ok(reminder)
    }

    /// Fetch a reminder, failing with NotFound when absent.
    pub async fn get(&self, id: ReminderId) -> AppResult<Reminder> {
        self.reminders
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reminder not found: {id}")))
    }

    /// List all reminders, newest-created first.
    pub async fn list(&self) -> AppResult<Vec<Reminder>> {
        self.reminders.list().await
    }

    /// List all reminders partitioned by category, in dashboard order.
    pub async fn partitioned(&self) -> AppResult<Vec<(ReminderCategory, Vec<Reminder>)>> {
        let all = self.reminders.list().await?;
        Ok(CATEGORY_ORDER
            .into_iter()
            .map(|category| {
                let bucket = all
                    .iter()
                    .filter(|r| r.category == category)
                    .cloned()
                    .collect();
                (category, bucket)
            })
            .collect())
    }

    /// Apply a partial update to a reminder.
    pub async fn update(&self, id: ReminderId, patch: ReminderPatch) -> AppResult<Reminder> {
        self.reminders.update(id, patch).await
    }

    /// Delete a reminder. Returns false when it was already gone.
    pub async fn delete(&self, id: ReminderId) -> AppResult<bool> {
        self.reminders.delete(id).await
    }

    /// Dereference the reminder's soft case pointer. A deleted case is
    /// not an error: the reminder simply has no linked case anymore.
    pub async fn linked_case(&self, reminder: &Reminder) -> AppResult<Option<Case>> {
        match reminder.case_id {
            Some(case_id) => self.cases.get(case_id).await,
            None => Ok(None),
        }
    }
}
