use async_trait::async_trait;

use revlog_core::record::RevisionRecord;

use crate::error::StoreError;

/// Trait for revision record storage backends.
///
/// The storage handle is externally owned and already open; implementations
/// neither open nor close connections on behalf of the engine, and must be
/// `Send + Sync` to be shared across tasks. `relation` selects the
/// destination table, allowing one backend to serve several subject types
/// with distinct history tables.
#[async_trait]
pub trait RevisionStore: Send + Sync {
    /// Persist the whole batch of records for one write event as a single
    /// bulk insert, so that either all records for the event become visible
    /// or none do (subject to the backend's bulk-insert atomicity).
    async fn insert_batch(
        &self,
        relation: &str,
        records: Vec<RevisionRecord>,
    ) -> Result<(), StoreError>;

    /// List records for one subject instance ordered newest-first,
    /// skipping the first `skip` and returning at most `take`.
    async fn list_desc(
        &self,
        relation: &str,
        subject_type: &str,
        subject_id: &str,
        skip: usize,
        take: usize,
    ) -> Result<Vec<RevisionRecord>, StoreError>;

    /// Delete a single record. Returns `true` if the record existed.
    async fn delete(&self, relation: &str, record: &RevisionRecord) -> Result<bool, StoreError>;
}
