use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Type annotation stored alongside a recorded value, aiding later
/// interpretation of the raw old/new columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastHint {
    /// No interpretation hint.
    #[default]
    None,
    /// The field holds a date/time; declared via the subject's temporal set.
    Date,
}

/// A single immutable audit entry describing one field's change (or a
/// soft-deletion event) on one subject instance.
///
/// Records are append-only: they are created by the record builder at write
/// time, never updated, and destroyed only by the retention enforcer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionRecord {
    /// Unique identifier for this record (UUID v4).
    pub id: String,

    /// Name of the tracked field that changed.
    pub field: String,
    /// Value before the write.
    pub old_value: Value,
    /// Value after the write.
    pub new_value: Value,

    // -- Polymorphic discriminator --
    /// Subject type discriminator. Together with `subject_id` this lets one
    /// revision table serve many subject types without per-type foreign keys.
    pub subject_type: String,
    /// Key of the subject instance.
    pub subject_id: String,

    /// Identity attributed as responsible for the change, if resolvable.
    pub actor_id: Option<Value>,
    /// Interpretation hint for the old/new values.
    #[serde(default)]
    pub cast: CastHint,

    // -- Timestamps --
    /// When this record was written.
    pub created_at: DateTime<Utc>,
    /// Same as `created_at`; records are never updated after creation.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{CastHint, RevisionRecord};
    use crate::value::Value;

    #[test]
    fn serde_roundtrip() {
        let now = Utc::now();
        let record = RevisionRecord {
            id: "rev-1".into(),
            field: "name".into(),
            old_value: Value::Text("A".into()),
            new_value: Value::Text("B".into()),
            subject_type: "post".into(),
            subject_id: "42".into(),
            actor_id: Some(Value::Int(7)),
            cast: CastHint::None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: RevisionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.field, "name");
        assert_eq!(back.old_value, Value::Text("A".into()));
        assert_eq!(back.new_value, Value::Text("B".into()));
        assert_eq!(back.subject_type, "post");
        assert_eq!(back.subject_id, "42");
        assert_eq!(back.actor_id, Some(Value::Int(7)));
        assert_eq!(back.cast, CastHint::None);
    }

    #[test]
    fn cast_hint_defaults_to_none() {
        let json = r#"{
            "id": "rev-2",
            "field": "published_at",
            "old_value": {"type": "null"},
            "new_value": {"type": "null"},
            "subject_type": "post",
            "subject_id": "1",
            "actor_id": null,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }"#;

        let record: RevisionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.cast, CastHint::None);
        assert!(record.actor_id.is_none());
    }

    #[test]
    fn cast_hint_serializes_snake_case() {
        let json = serde_json::to_value(CastHint::Date).unwrap();
        assert_eq!(json, "date");
    }
}
