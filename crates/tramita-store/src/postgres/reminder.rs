//! PostgreSQL reminder store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tramita_core::error::{AppError, ErrorKind};
use tramita_core::result::AppResult;
use tramita_core::traits::RecordStore;
use tramita_core::types::{CaseId, ReminderId};
use tramita_entity::reminder::{NewReminder, Reminder, ReminderCategory, ReminderPatch};

/// PostgreSQL-backed reminder store.
#[derive(Debug, Clone)]
pub struct PgReminderStore {
    pool: PgPool,
}

impl PgReminderStore {
    /// Create a new reminder store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row mapping between the `reminders` table and the [`Reminder`] entity.
///
/// The category is stored as its legacy tag string; unknown or NULL tags
/// fall into the generic bucket when reading.
#[derive(Debug, sqlx::FromRow)]
struct ReminderRow {
    id: ReminderId,
    case_id: Option<CaseId>,
    client_name: String,
    client_surname: String,
    phone: Option<String>,
    reminder_date: DateTime<Utc>,
    notes: Option<String>,
    category: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReminderRow> for Reminder {
    fn from(row: ReminderRow) -> Self {
        Self {
            id: row.id,
            case_id: row.case_id,
            client_name: row.client_name,
            client_surname: row.client_surname,
            phone: row.phone,
            reminder_date: row.reminder_date,
            notes: row.notes,
            category: ReminderCategory::from_tag(row.category.as_deref()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl RecordStore<ReminderId, NewReminder, ReminderPatch, Reminder> for PgReminderStore {
    async fn create(&self, draft: NewReminder) -> AppResult<Reminder> {
        let reminder = Reminder::from_draft(draft);

        sqlx::query(
            "INSERT INTO reminders (id, case_id, client_name, client_surname, phone, \
             reminder_date, notes, category, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(reminder.id)
        .bind(reminder.case_id)
        .bind(&reminder.client_name)
        .bind(&reminder.client_surname)
        .bind(&reminder.phone)
        .bind(reminder.reminder_date)
        .bind(&reminder.notes)
        .bind(reminder.category.as_str())
        .bind(reminder.created_at)
        .bind(reminder.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create reminder", e))?;

        Ok(reminder)
    }

    async fn get(&self, id: ReminderId) -> AppResult<Option<Reminder>> {
        let row = sqlx::query_as::<_, ReminderRow>("SELECT * FROM reminders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to get reminder", e)
            })?;
        Ok(row.map(Reminder::from))
    }

    async fn list(&self) -> AppResult<Vec<Reminder>> {
        let rows =
            sqlx::query_as::<_, ReminderRow>("SELECT * FROM reminders ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list reminders", e)
                })?;
        Ok(rows.into_iter().map(Reminder::from).collect())
    }

    async fn update(&self, id: ReminderId, patch: ReminderPatch) -> AppResult<Reminder> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let row = sqlx::query_as::<_, ReminderRow>("SELECT * FROM reminders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load reminder for update", e)
            })?;

        let mut reminder: Reminder = row
            .ok_or_else(|| AppError::not_found(format!("Reminder not found: {id}")))?
            .into();
        patch.apply(&mut reminder);
        reminder.updated_at = Utc::now();

        sqlx::query(
            "UPDATE reminders SET case_id = $2, client_name = $3, client_surname = $4, \
             phone = $5, reminder_date = $6, notes = $7, category = $8, updated_at = $9 \
             WHERE id = $1",
        )
        .bind(reminder.id)
        .bind(reminder.case_id)
        .bind(&reminder.client_name)
        .bind(&reminder.client_surname)
        .bind(&reminder.phone)
        .bind(reminder.reminder_date)
        .bind(&reminder.notes)
        .bind(reminder.category.as_str())
        .bind(reminder.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update reminder", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit reminder update", e)
        })?;

        Ok(reminder)
    }

    async fn delete(&self, id: ReminderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete reminder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
