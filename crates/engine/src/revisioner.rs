use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, instrument};

use revlog_core::record::RevisionRecord;
use revlog_core::subject::Revisionable;
use revlog_store::store::RevisionStore;

use crate::builder::RecordBuilder;
use crate::differ;
use crate::enforcer;
use crate::error::RevisionError;

/// Per-registered-type state.
struct Registration {
    enabled: bool,
}

/// Entry points the host record/framework invokes at commit time.
///
/// The revisioner owns no scheduling and manages no transactions: the host
/// must call [`after_update`](Self::after_update) and
/// [`after_delete`](Self::after_delete) only after the underlying write is
/// durable, so that revision records never reference a rolled-back write.
/// Both hooks run inline on the caller's task; the only suspension points
/// are the storage operations themselves.
///
/// Subject types must be registered before their first hook call.
/// Registration validates the tracked-field whitelist once, at boot, and
/// refuses types with an empty whitelist.
pub struct Revisioner {
    store: Arc<dyn RevisionStore>,
    registry: DashMap<String, Registration>,
}

impl Revisioner {
    /// Create a revisioner over an already-open storage handle.
    pub fn new(store: Arc<dyn RevisionStore>) -> Self {
        Self {
            store,
            registry: DashMap::new(),
        }
    }

    /// Register a subject type, validating its configuration.
    ///
    /// Must be called once per subject type before either hook fires for an
    /// instance of it. An empty tracked-field whitelist is a fatal
    /// configuration error: the type is refused and never tracked.
    pub fn register(&self, subject: &dyn Revisionable) -> Result<(), RevisionError> {
        if subject.tracked_fields().is_empty() {
            return Err(RevisionError::EmptyWhitelist {
                subject_type: subject.subject_type().to_owned(),
            });
        }

        self.registry
            .entry(subject.subject_type().to_owned())
            .or_insert(Registration { enabled: true });
        Ok(())
    }

    /// Arbitrarily pause or resume tracking for a registered type. Hooks on
    /// a paused type are silent no-ops.
    pub fn set_enabled(&self, subject_type: &str, enabled: bool) {
        if let Some(mut registration) = self.registry.get_mut(subject_type) {
            registration.enabled = enabled;
        }
    }

    /// Record the field-level diff of a committed update, then run one
    /// retention pass. Returns the number of records inserted.
    ///
    /// If no whitelisted field changed, nothing is inserted and no storage
    /// call is issued.
    #[instrument(skip(self, subject), fields(subject_type = subject.subject_type()))]
    pub async fn after_update(&self, subject: &dyn Revisionable) -> Result<usize, RevisionError> {
        if !self.is_enabled(subject)? {
            return Ok(0);
        }

        let changes = differ::changed_fields(subject);
        if changes.is_empty() {
            debug!("no tracked fields changed");
            return Ok(0);
        }

        let builder = RecordBuilder::for_event(subject)?;
        let records: Vec<RevisionRecord> =
            changes.into_iter().map(|c| builder.build(c)).collect();
        self.persist(subject, records).await
    }

    /// Record a committed soft-deletion, then run one retention pass.
    /// Returns the number of records inserted.
    ///
    /// Hard-deleted subjects (no soft-delete capability) produce no delete
    /// revision; their existing history is simply left behind.
    #[instrument(skip(self, subject), fields(subject_type = subject.subject_type()))]
    pub async fn after_delete(&self, subject: &dyn Revisionable) -> Result<usize, RevisionError> {
        if !self.is_enabled(subject)? {
            return Ok(0);
        }

        let Some(change) = differ::deletion_change(subject) else {
            return Ok(0);
        };

        let builder = RecordBuilder::for_event(subject)?;
        let record = builder.build(change);
        self.persist(subject, vec![record]).await
    }

    fn is_enabled(&self, subject: &dyn Revisionable) -> Result<bool, RevisionError> {
        match self.registry.get(subject.subject_type()) {
            Some(registration) => Ok(registration.enabled),
            None => Err(RevisionError::NotRegistered {
                subject_type: subject.subject_type().to_owned(),
            }),
        }
    }

    async fn persist(
        &self,
        subject: &dyn Revisionable,
        records: Vec<RevisionRecord>,
    ) -> Result<usize, RevisionError> {
        let relation = subject.relation_name();
        let subject_id = subject.subject_id();
        let inserted = records.len();

        self.store.insert_batch(relation, records).await?;

        let removed = enforcer::trim_history(
            self.store.as_ref(),
            relation,
            subject.subject_type(),
            &subject_id,
            &subject.retention(),
        )
        .await?;

        debug!(inserted, removed, subject_id = %subject_id, "recorded revision batch");
        Ok(inserted)
    }
}
