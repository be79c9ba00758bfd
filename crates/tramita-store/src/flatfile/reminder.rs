//! Flat-file reminder store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::info;

use tramita_core::error::{AppError, ErrorKind};
use tramita_core::result::AppResult;
use tramita_core::traits::RecordStore;
use tramita_core::types::ReminderId;
use tramita_entity::reminder::{NewReminder, Reminder, ReminderPatch};

/// Flat-file reminder store backed by `reminders.json` in the data
/// directory.
#[derive(Debug)]
pub struct FlatFileReminderStore {
    path: PathBuf,
    reminders: RwLock<HashMap<ReminderId, Reminder>>,
}

impl FlatFileReminderStore {
    /// Open the store, loading any existing snapshot from the data
    /// directory.
    pub async fn open(data_dir: impl AsRef<Path>) -> AppResult<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create data directory: {}", data_dir.display()),
                e,
            )
        })?;

        let path = data_dir.join("reminders.json");
        let loaded: Vec<Reminder> = super::read_snapshot(&path).await?;
        info!(count = loaded.len(), path = %path.display(), "Loaded reminder store");

        let reminders = loaded.into_iter().map(|r| (r.id, r)).collect();
        Ok(Self {
            path,
            reminders: RwLock::new(reminders),
        })
    }

    async fn persist(&self, reminders: &HashMap<ReminderId, Reminder>) -> AppResult<()> {
        let mut items: Vec<&Reminder> = reminders.values().collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        super::write_snapshot(&self.path, &items).await
    }
}

#[async_trait]
impl RecordStore<ReminderId, NewReminder, ReminderPatch, Reminder> for FlatFileReminderStore {
    async fn create(&self, draft: NewReminder) -> AppResult<Reminder> {
        let reminder = Reminder::from_draft(draft);
        let mut reminders = self.reminders.write().await;
        reminders.insert(reminder.id, reminder.clone());
        self.persist(&reminders).await?;
        Ok(reminder)
    }

    async fn get(&self, id: ReminderId) -> AppResult<Option<Reminder>> {
        Ok(self.reminders.read().await.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Reminder>> {
        let reminders = self.reminders.read().await;
        let mut items: Vec<Reminder> = reminders.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn update(&self, id: ReminderId, patch: ReminderPatch) -> AppResult<Reminder> {
        let mut reminders = self.reminders.write().await;
        let reminder = reminders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Reminder not found: {id}")))?;
        patch.apply(reminder);
        reminder.updated_at = Utc::now();
        let updated = reminder.clone();
        self.persist(&reminders).await?;
        Ok(updated)
    }

    async fn delete(&self, id: ReminderId) -> AppResult<bool> {
        let mut reminders = self.reminders.write().await;
        if reminders.remove(&id).is_none() {
            return Ok(false);
        }
        self.persist(&reminders).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tramita_entity::reminder::ReminderCategory;

    fn draft(name: &str) -> NewReminder {
        NewReminder {
            case_id: None,
            client_name: name.into(),
            client_surname: "Haddad".into(),
            phone: None,
            reminder_date: Utc::now(),
            notes: None,
            category: ReminderCategory::Pagos,
        }
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = FlatFileReminderStore::open(dir.path()).await.unwrap();
            store.create(draft("Omar")).await.unwrap().id
        };

        let reopened = FlatFileReminderStore::open(dir.path()).await.unwrap();
        let reminder = reopened.get(id).await.unwrap().unwrap();
        assert_eq!(reminder.client_name, "Omar");
        assert_eq!(reminder.category, ReminderCategory::Pagos);
    }

    #[tokio::test]
    async fn test_patch_preserves_unset_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileReminderStore::open(dir.path()).await.unwrap();
        let created = store.create(draft("Omar")).await.unwrap();

        let patch = ReminderPatch {
            notes: Some(Some("call before noon".into())),
            ..Default::default()
        };
        let updated = store.update(created.id, patch).await.unwrap();
        assert_eq!(updated.notes.as_deref(), Some("call before noon"));
        assert_eq!(updated.client_name, "Omar");
        assert_eq!(updated.category, ReminderCategory::Pagos);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileReminderStore::open(dir.path()).await.unwrap();

        let err = store
            .update(ReminderId::new(), ReminderPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
