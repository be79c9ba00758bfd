//! Standalone reminder entities.

pub mod model;

pub use model::{NewReminder, Reminder, ReminderCategory, ReminderPatch};
