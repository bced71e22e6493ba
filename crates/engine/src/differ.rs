use revlog_core::subject::Revisionable;
use revlog_core::value::Value;

/// One field-level change to record: `(field, old, new)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub old: Value,
    pub new: Value,
}

/// Compute the changes to record for a committed update.
///
/// Yields one change per whitelisted field whose value actually differs
/// between the original and current snapshots, in the subject's dirty-set
/// iteration order (the order carries no meaning). An empty result means the
/// write touched nothing trackable and all downstream stages are skipped.
pub fn changed_fields(subject: &dyn Revisionable) -> Vec<FieldChange> {
    let tracked = subject.tracked_fields();

    subject
        .dirty_fields()
        .into_iter()
        .filter(|field| tracked.contains(&field.as_str()))
        .filter_map(|field| {
            let old = subject.original_value(&field);
            let new = subject.current_value(&field);
            if old == new {
                return None;
            }
            Some(FieldChange { field, old, new })
        })
        .collect()
}

/// Compute the single synthetic change for a committed delete.
///
/// Only soft deletions are recorded: the subject must support soft deletion,
/// its soft-delete timestamp field must be whitelisted, and a deletion
/// timestamp must be present. A hard-deleted subject yields `None` — its
/// own revisions become orphaned together, and no delete revision is
/// written.
pub fn deletion_change(subject: &dyn Revisionable) -> Option<FieldChange> {
    if !subject.supports_soft_delete() {
        return None;
    }

    let field = subject.deleted_at_field();
    if !subject.tracked_fields().contains(&field) {
        return None;
    }

    let deleted_at = subject.deleted_at()?;
    Some(FieldChange {
        field: field.to_owned(),
        old: Value::Null,
        new: Value::Timestamp(deleted_at),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use revlog_core::testing::TestSubject;
    use revlog_core::value::Value;

    use super::{changed_fields, deletion_change};

    #[test]
    fn yields_one_change_per_dirty_tracked_field() {
        let subject = TestSubject::new("post", "1", &["name", "status"])
            .with_change("name", "A", "B")
            .with_change("status", "draft", "published")
            .with_change("internal_note", "x", "y");

        let changes = changed_fields(&subject);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, "name");
        assert_eq!(changes[0].old, Value::Text("A".into()));
        assert_eq!(changes[0].new, Value::Text("B".into()));
        assert_eq!(changes[1].field, "status");
    }

    #[test]
    fn skips_dirty_fields_with_equal_values() {
        let subject = TestSubject::new("post", "1", &["name", "status"])
            .with_change("name", "A", "B")
            .with_touched("status", "draft");

        let changes = changed_fields(&subject);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "name");
    }

    #[test]
    fn clean_subject_yields_nothing() {
        let subject = TestSubject::new("post", "1", &["name"]);
        assert!(changed_fields(&subject).is_empty());
    }

    #[test]
    fn untracked_changes_yield_nothing() {
        let subject =
            TestSubject::new("post", "1", &["name"]).with_change("views", 1_i64, 2_i64);
        assert!(changed_fields(&subject).is_empty());
    }

    #[test]
    fn soft_delete_yields_single_synthetic_change() {
        let deleted_at = Utc::now();
        let subject = TestSubject::new("post", "1", &["name", "deleted_at"])
            .with_soft_delete(Some(deleted_at));

        let change = deletion_change(&subject).unwrap();
        assert_eq!(change.field, "deleted_at");
        assert_eq!(change.old, Value::Null);
        assert_eq!(change.new, Value::Timestamp(deleted_at));
    }

    #[test]
    fn hard_delete_yields_nothing() {
        let subject = TestSubject::new("post", "1", &["name", "deleted_at"]);
        assert!(deletion_change(&subject).is_none());
    }

    #[test]
    fn soft_delete_with_untracked_timestamp_field_yields_nothing() {
        let subject =
            TestSubject::new("post", "1", &["name"]).with_soft_delete(Some(Utc::now()));
        assert!(deletion_change(&subject).is_none());
    }

    #[test]
    fn soft_delete_without_timestamp_yields_nothing() {
        let subject =
            TestSubject::new("post", "1", &["name", "deleted_at"]).with_soft_delete(None);
        assert!(deletion_change(&subject).is_none());
    }
}
