//! PostgreSQL-backed record stores.
//!
//! Scalar case fields live in typed columns; the document lists and the
//! payment ledger are JSONB documents. Every mutation lands as a single-row
//! statement, and partial updates re-read the row under `FOR UPDATE` so the
//! merge happens against the latest committed state.

mod case;
mod reminder;

pub use case::PgCaseStore;
pub use reminder::PgReminderStore;
