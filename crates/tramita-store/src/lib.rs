//! # tramita-store
//!
//! Durable persistence for cases and reminders. Two interchangeable
//! backends implement the same [`RecordStore`] contract: a PostgreSQL
//! backend (JSONB document columns, single-row UPDATE per mutation) and a
//! flat-file backend (in-memory maps mirrored to JSON files, fully
//! rewritten on every mutation).

pub mod connection;
pub mod flatfile;
pub mod migration;
pub mod postgres;

use tramita_core::traits::RecordStore;
use tramita_core::types::{CaseId, ReminderId};
use tramita_entity::case::{Case, CasePatch, NewCase};
use tramita_entity::reminder::{NewReminder, Reminder, ReminderPatch};

pub use connection::DatabasePool;

/// Store contract for cases.
pub trait CaseStore: RecordStore<CaseId, NewCase, CasePatch, Case> {}

impl<T: RecordStore<CaseId, NewCase, CasePatch, Case> + ?Sized> CaseStore for T {}

/// Store contract for standalone reminders.
pub trait ReminderStore: RecordStore<ReminderId, NewReminder, ReminderPatch, Reminder> {}

impl<T: RecordStore<ReminderId, NewReminder, ReminderPatch, Reminder> + ?Sized> ReminderStore
    for T
{
}
