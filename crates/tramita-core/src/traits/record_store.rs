//! Generic record store trait for durable case and reminder persistence.

use async_trait::async_trait;

use crate::result::AppResult;

/// Generic CRUD store contract.
///
/// This trait is defined with generic type parameters so that each entity
/// can have a strongly typed store. Both persistence backends (flat-file
/// and PostgreSQL) implement the same contract and must be observably
/// interchangeable:
///
/// - `list` returns records ordered newest-created first.
/// - `update` performs a whole-record merge: every field present in the
///   patch replaces the stored field entirely (list-valued fields are
///   replaced wholesale, never diffed); absent fields are preserved.
///   Concurrent updates race with last-writer-wins semantics.
/// - `delete` returns `true` only when a record was actually removed.
#[async_trait]
pub trait RecordStore<Id, New, Patch, Entity>: Send + Sync + 'static
where
    Id: Send + Sync + 'static,
    New: Send + Sync + 'static,
    Patch: Send + Sync + 'static,
    Entity: Send + Sync + 'static,
{
    /// Create a new record from a draft and return the stored entity.
    async fn create(&self, draft: New) -> AppResult<Entity>;

    /// Find a record by its primary key.
    async fn get(&self, id: Id) -> AppResult<Option<Entity>>;

    /// List all records, newest-created first.
    async fn list(&self) -> AppResult<Vec<Entity>>;

    /// Apply a partial update and return the merged record.
    ///
    /// Fails with a NotFound error when the record does not exist.
    async fn update(&self, id: Id, patch: Patch) -> AppResult<Entity>;

    /// Delete a record by its primary key. Returns `true` if deleted.
    async fn delete(&self, id: Id) -> AppResult<bool>;
}
