use chrono::{DateTime, Utc};

use crate::error::SubjectError;
use crate::policy::RetentionPolicy;
use crate::value::Value;

/// Default relation name for a subject's revision history.
pub const REVISION_HISTORY: &str = "revision_history";

/// The identity a change is attributed to, as produced by a subject's actor
/// resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum ActorRef {
    /// An identifiable entity; its key becomes the recorded actor id.
    Entity { id: String },
    /// A raw value (e.g. an external username) recorded as-is.
    Raw(Value),
}

/// Capability contract a record type implements to participate in revision
/// tracking.
///
/// Everything is declared statically by the implementing type; there is no
/// runtime introspection. The tracked-field whitelist must be non-empty.
/// That is validated once when the type is registered with the engine, and
/// an empty whitelist is a fatal configuration error.
///
/// Optional capabilities (actor resolution, soft deletion) have default
/// implementations that declare the capability absent.
pub trait Revisionable {
    /// Polymorphic type discriminator stored on every revision record.
    fn subject_type(&self) -> &str;

    /// Key of this subject instance.
    fn subject_id(&self) -> String;

    /// The fixed whitelist of field names eligible for auditing.
    fn tracked_fields(&self) -> &[&str];

    /// Names of fields whose values changed in the committed write, in the
    /// order the host enumerates them.
    fn dirty_fields(&self) -> Vec<String>;

    /// Value of `field` before the write.
    fn original_value(&self, field: &str) -> Value;

    /// Value of `field` after the write.
    fn current_value(&self, field: &str) -> Value;

    /// Fields holding date/time values; drives the `date` cast hint.
    fn temporal_fields(&self) -> &[&str] {
        &[]
    }

    /// Resolve the identity responsible for the current write.
    ///
    /// The default implementation declares the capability absent, which is
    /// recorded as a null actor. `Ok(None)` from an implementation means the
    /// resolver ran but found no actor, which is also recorded as null.
    /// Errors propagate and fail the write.
    fn resolve_actor(&self) -> Result<Option<ActorRef>, SubjectError> {
        Ok(None)
    }

    /// Whether this subject is soft-deleted rather than physically removed.
    /// Hard-deleted subjects produce no delete revision.
    fn supports_soft_delete(&self) -> bool {
        false
    }

    /// The soft-deletion timestamp, once set.
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Name of the soft-deletion timestamp field.
    fn deleted_at_field(&self) -> &str {
        "deleted_at"
    }

    /// Relation (table) the subject's revision history is stored in.
    fn relation_name(&self) -> &str {
        REVISION_HISTORY
    }

    /// Retention policy for this subject type.
    fn retention(&self) -> RetentionPolicy {
        RetentionPolicy::default()
    }
}
