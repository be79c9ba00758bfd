//! Core traits defined in `tramita-core` and implemented by other crates.

pub mod file_store;
pub mod record_store;

pub use file_store::{FileStore, StoredFile};
pub use record_store::RecordStore;
