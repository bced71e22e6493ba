use thiserror::Error;

/// Errors raised by a subject's own capabilities.
#[derive(Debug, Error)]
pub enum SubjectError {
    /// The subject's actor resolver failed.
    ///
    /// Resolving the current actor is a required side effect when the
    /// capability is present, so this propagates to the caller rather than
    /// degrading to a null actor.
    #[error("actor resolution failed: {0}")]
    ActorResolution(String),
}
