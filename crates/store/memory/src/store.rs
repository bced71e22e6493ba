use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use revlog_core::record::RevisionRecord;
use revlog_store::error::StoreError;
use revlog_store::store::RevisionStore;

/// One stored record plus the insertion sequence used for recency ordering.
/// Records inserted in one batch share a timestamp, so `created_at` alone
/// cannot order them.
#[derive(Debug, Clone)]
struct Stored {
    seq: u64,
    record: RevisionRecord,
}

/// In-memory revision store using `DashMap`. Suitable for development and
/// testing.
///
/// Records are grouped by relation name; each batch insert appends under a
/// single map-entry lock, so a batch becomes visible as a whole.
pub struct MemoryRevisionStore {
    relations: DashMap<String, Vec<Stored>>,
    seq: AtomicU64,
}

impl MemoryRevisionStore {
    /// Create a new empty in-memory revision store.
    pub fn new() -> Self {
        Self {
            relations: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    /// Count the live records for one subject instance. Test/introspection
    /// helper, not part of the [`RevisionStore`] contract.
    pub fn count_for(&self, relation: &str, subject_type: &str, subject_id: &str) -> usize {
        self.relations.get(relation).map_or(0, |stored| {
            stored
                .iter()
                .filter(|s| {
                    s.record.subject_type == subject_type && s.record.subject_id == subject_id
                })
                .count()
        })
    }
}

impl Default for MemoryRevisionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevisionStore for MemoryRevisionStore {
    async fn insert_batch(
        &self,
        relation: &str,
        records: Vec<RevisionRecord>,
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut stored = self.relations.entry(relation.to_owned()).or_default();
        for record in records {
            let seq = self.seq.fetch_add(1, Ordering::Relaxed);
            stored.push(Stored { seq, record });
        }
        Ok(())
    }

    async fn list_desc(
        &self,
        relation: &str,
        subject_type: &str,
        subject_id: &str,
        skip: usize,
        take: usize,
    ) -> Result<Vec<RevisionRecord>, StoreError> {
        let Some(stored) = self.relations.get(relation) else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<Stored> = stored
            .iter()
            .filter(|s| s.record.subject_type == subject_type && s.record.subject_id == subject_id)
            .cloned()
            .collect();

        // Newest first by insertion sequence.
        matching.sort_by(|a, b| b.seq.cmp(&a.seq));

        Ok(matching
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|s| s.record)
            .collect())
    }

    async fn delete(&self, relation: &str, record: &RevisionRecord) -> Result<bool, StoreError> {
        let Some(mut stored) = self.relations.get_mut(relation) else {
            return Ok(false);
        };

        let before = stored.len();
        stored.retain(|s| s.record.id != record.id);
        Ok(stored.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use revlog_core::record::{CastHint, RevisionRecord};
    use revlog_core::value::Value;
    use revlog_store::store::RevisionStore;

    use super::MemoryRevisionStore;

    fn make_record(id: &str, subject_id: &str) -> RevisionRecord {
        let now = Utc::now();
        RevisionRecord {
            id: id.to_owned(),
            field: "name".to_owned(),
            old_value: Value::Text("A".to_owned()),
            new_value: Value::Text("B".to_owned()),
            subject_type: "post".to_owned(),
            subject_id: subject_id.to_owned(),
            actor_id: None,
            cast: CastHint::None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_and_list_newest_first() {
        let store = MemoryRevisionStore::new();
        store
            .insert_batch("revision_history", vec![make_record("r1", "s1")])
            .await
            .unwrap();
        store
            .insert_batch("revision_history", vec![make_record("r2", "s1")])
            .await
            .unwrap();

        let listed = store
            .list_desc("revision_history", "post", "s1", 0, 10)
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "r2");
        assert_eq!(listed[1].id, "r1");
    }

    #[tokio::test]
    async fn list_applies_skip_and_take() {
        let store = MemoryRevisionStore::new();
        for i in 0..10 {
            store
                .insert_batch("revision_history", vec![make_record(&format!("r{i}"), "s1")])
                .await
                .unwrap();
        }

        let listed = store
            .list_desc("revision_history", "post", "s1", 3, 4)
            .await
            .unwrap();
        assert_eq!(listed.len(), 4);
        // Newest is r9; skipping 3 lands on r6..r3.
        assert_eq!(listed[0].id, "r6");
        assert_eq!(listed[3].id, "r3");
    }

    #[tokio::test]
    async fn list_is_scoped_to_subject_instance() {
        let store = MemoryRevisionStore::new();
        store
            .insert_batch(
                "revision_history",
                vec![make_record("r1", "s1"), make_record("r2", "s2")],
            )
            .await
            .unwrap();

        let listed = store
            .list_desc("revision_history", "post", "s1", 0, 10)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "r1");

        let listed = store
            .list_desc("revision_history", "user", "s1", 0, 10)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn relations_are_isolated() {
        let store = MemoryRevisionStore::new();
        store
            .insert_batch("post_history", vec![make_record("r1", "s1")])
            .await
            .unwrap();

        let listed = store
            .list_desc("revision_history", "post", "s1", 0, 10)
            .await
            .unwrap();
        assert!(listed.is_empty());
        assert_eq!(store.count_for("post_history", "post", "s1"), 1);
    }

    #[tokio::test]
    async fn delete_removes_one_record() {
        let store = MemoryRevisionStore::new();
        let r1 = make_record("r1", "s1");
        let r2 = make_record("r2", "s1");
        store
            .insert_batch("revision_history", vec![r1.clone(), r2])
            .await
            .unwrap();

        assert!(store.delete("revision_history", &r1).await.unwrap());
        assert!(!store.delete("revision_history", &r1).await.unwrap());

        let listed = store
            .list_desc("revision_history", "post", "s1", 0, 10)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "r2");
    }

    #[tokio::test]
    async fn empty_batch_is_a_noop() {
        let store = MemoryRevisionStore::new();
        store.insert_batch("revision_history", vec![]).await.unwrap();
        assert_eq!(store.count_for("revision_history", "post", "s1"), 0);
    }
}
