use thiserror::Error;

use revlog_core::error::SubjectError;
use revlog_store::error::StoreError;

/// Errors raised by the revision engine.
#[derive(Debug, Error)]
pub enum RevisionError {
    /// A hook was invoked for a subject type that was never registered.
    /// Registration is where configuration is validated, so operating on an
    /// unregistered type is refused rather than guessed at.
    #[error("subject type `{subject_type}` is not registered for revision tracking")]
    NotRegistered { subject_type: String },

    /// A subject type was registered with an empty tracked-field whitelist.
    /// This is a programming error to fix, not a condition to retry.
    #[error("subject type `{subject_type}` declares no tracked fields")]
    EmptyWhitelist { subject_type: String },

    /// A subject capability failed (currently only actor resolution).
    #[error(transparent)]
    Subject(#[from] SubjectError),

    /// The storage backend failed; propagated unchanged so the caller's
    /// transaction boundary decides rollback.
    #[error(transparent)]
    Store(#[from] StoreError),
}
