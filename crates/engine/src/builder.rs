use chrono::{DateTime, Utc};
use uuid::Uuid;

use revlog_core::error::SubjectError;
use revlog_core::record::{CastHint, RevisionRecord};
use revlog_core::subject::{ActorRef, Revisionable};
use revlog_core::value::Value;

use crate::differ::FieldChange;

/// Materializes [`RevisionRecord`]s for one write event.
///
/// The actor is resolved and the write timestamp pinned once per event, so
/// every record in the event's batch carries the same attribution and
/// `created_at`.
pub struct RecordBuilder {
    subject_type: String,
    subject_id: String,
    temporal: Vec<String>,
    actor_id: Option<Value>,
    now: DateTime<Utc>,
}

impl RecordBuilder {
    /// Prepare a builder for one write event on `subject`.
    ///
    /// Invokes the subject's actor-resolution capability: an identifiable
    /// entity contributes its key, a raw value is recorded as-is, and an
    /// absent capability (or a resolver that finds nothing) degrades to a
    /// null actor. A failing resolver propagates and fails the write.
    pub fn for_event(subject: &dyn Revisionable) -> Result<Self, SubjectError> {
        let actor_id = match subject.resolve_actor()? {
            Some(ActorRef::Entity { id }) => Some(Value::Text(id)),
            Some(ActorRef::Raw(value)) => Some(value),
            None => None,
        };

        Ok(Self {
            subject_type: subject.subject_type().to_owned(),
            subject_id: subject.subject_id(),
            temporal: subject
                .temporal_fields()
                .iter()
                .map(|f| (*f).to_owned())
                .collect(),
            actor_id,
            now: Utc::now(),
        })
    }

    /// Turn one diff tuple into a fully-populated record.
    pub fn build(&self, change: FieldChange) -> RevisionRecord {
        let cast = if self.temporal.iter().any(|f| f == &change.field) {
            CastHint::Date
        } else {
            CastHint::None
        };

        RevisionRecord {
            id: Uuid::new_v4().to_string(),
            field: change.field,
            old_value: change.old,
            new_value: change.new,
            subject_type: self.subject_type.clone(),
            subject_id: self.subject_id.clone(),
            actor_id: self.actor_id.clone(),
            cast,
            created_at: self.now,
            updated_at: self.now,
        }
    }
}
