//! Test support: a configurable in-memory [`Revisionable`] subject.
//!
//! Used by the engine's test suites; not intended for production code.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::SubjectError;
use crate::policy::RetentionPolicy;
use crate::subject::{ActorRef, REVISION_HISTORY, Revisionable};
use crate::value::Value;

/// How the fixture's actor-resolution capability behaves.
#[derive(Debug, Clone, Default)]
pub enum ActorBehavior {
    /// Capability absent (the trait default).
    #[default]
    Absent,
    /// Resolver runs but finds no actor.
    ResolvesNone,
    /// Resolver yields an actor.
    Resolves(ActorRef),
    /// Resolver fails with the given message.
    Fails(String),
}

/// A scriptable subject for exercising the diff/build/retention pipeline.
pub struct TestSubject {
    subject_type: String,
    id: String,
    tracked: Vec<&'static str>,
    temporal: Vec<&'static str>,
    dirty: Vec<String>,
    original: HashMap<String, Value>,
    current: HashMap<String, Value>,
    actor: ActorBehavior,
    soft_delete: bool,
    deleted_at: Option<DateTime<Utc>>,
    relation: String,
    policy: RetentionPolicy,
}

impl TestSubject {
    /// Create a subject of the given type and id with a tracked-field
    /// whitelist.
    pub fn new(subject_type: &str, id: &str, tracked: &[&'static str]) -> Self {
        Self {
            subject_type: subject_type.to_owned(),
            id: id.to_owned(),
            tracked: tracked.to_vec(),
            temporal: Vec::new(),
            dirty: Vec::new(),
            original: HashMap::new(),
            current: HashMap::new(),
            actor: ActorBehavior::Absent,
            soft_delete: false,
            deleted_at: None,
            relation: REVISION_HISTORY.to_owned(),
            policy: RetentionPolicy::default(),
        }
    }

    /// Record a field as dirty with the given before/after values.
    #[must_use]
    pub fn with_change(mut self, field: &str, old: impl Into<Value>, new: impl Into<Value>) -> Self {
        self.original.insert(field.to_owned(), old.into());
        self.current.insert(field.to_owned(), new.into());
        self.dirty.push(field.to_owned());
        self
    }

    /// Record a field as dirty even though its value is unchanged (e.g. a
    /// host that reports touched-but-equal fields).
    #[must_use]
    pub fn with_touched(mut self, field: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.original.insert(field.to_owned(), value.clone());
        self.current.insert(field.to_owned(), value);
        self.dirty.push(field.to_owned());
        self
    }

    /// Declare temporal fields for cast-hint inference.
    #[must_use]
    pub fn with_temporal(mut self, temporal: &[&'static str]) -> Self {
        self.temporal = temporal.to_vec();
        self
    }

    /// Script the actor-resolution capability.
    #[must_use]
    pub fn with_actor(mut self, actor: ActorBehavior) -> Self {
        self.actor = actor;
        self
    }

    /// Mark the subject soft-deletable, optionally already deleted.
    #[must_use]
    pub fn with_soft_delete(mut self, deleted_at: Option<DateTime<Utc>>) -> Self {
        self.soft_delete = true;
        self.deleted_at = deleted_at;
        self
    }

    /// Override the revision relation name.
    #[must_use]
    pub fn with_relation(mut self, relation: &str) -> Self {
        self.relation = relation.to_owned();
        self
    }

    /// Override the retention policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetentionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Revisionable for TestSubject {
    fn subject_type(&self) -> &str {
        &self.subject_type
    }

    fn subject_id(&self) -> String {
        self.id.clone()
    }

    fn tracked_fields(&self) -> &[&str] {
        &self.tracked
    }

    fn dirty_fields(&self) -> Vec<String> {
        self.dirty.clone()
    }

    fn original_value(&self, field: &str) -> Value {
        self.original.get(field).cloned().unwrap_or(Value::Null)
    }

    fn current_value(&self, field: &str) -> Value {
        self.current.get(field).cloned().unwrap_or(Value::Null)
    }

    fn temporal_fields(&self) -> &[&str] {
        &self.temporal
    }

    fn resolve_actor(&self) -> Result<Option<ActorRef>, SubjectError> {
        match &self.actor {
            ActorBehavior::Absent | ActorBehavior::ResolvesNone => Ok(None),
            ActorBehavior::Resolves(actor) => Ok(Some(actor.clone())),
            ActorBehavior::Fails(message) => {
                Err(SubjectError::ActorResolution(message.clone()))
            }
        }
    }

    fn supports_soft_delete(&self) -> bool {
        self.soft_delete
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn relation_name(&self) -> &str {
        &self.relation
    }

    fn retention(&self) -> RetentionPolicy {
        self.policy.clone()
    }
}
