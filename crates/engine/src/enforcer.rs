use revlog_core::policy::RetentionPolicy;
use revlog_store::error::StoreError;
use revlog_store::store::RevisionStore;

/// Run one bounded retention pass for a subject instance, returning the
/// number of records deleted.
///
/// Queries the subject's history newest-first, skips the most recent
/// `policy.limit` records, and deletes up to `policy.cleanup_batch` of the
/// remainder one record at a time. Per-record deletion means a failure
/// mid-batch leaves an over-limit but otherwise consistent history; the
/// partial progress is kept and the next write's pass continues the trim.
///
/// Bounding the batch bounds the worst-case per-write deletion cost. A
/// subject with a large backlog converges toward `limit` across several
/// writes instead of paying for one unbounded pass, so the live count may
/// transiently reach `limit + cleanup_batch - 1`.
pub async fn trim_history(
    store: &dyn RevisionStore,
    relation: &str,
    subject_type: &str,
    subject_id: &str,
    policy: &RetentionPolicy,
) -> Result<u64, StoreError> {
    let overflow = store
        .list_desc(
            relation,
            subject_type,
            subject_id,
            policy.limit,
            policy.cleanup_batch,
        )
        .await?;

    let mut deleted = 0u64;
    for record in &overflow {
        if store.delete(relation, record).await? {
            deleted += 1;
        }
    }

    Ok(deleted)
}
