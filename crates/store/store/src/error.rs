/// Errors that can occur during revision store operations.
///
/// Backends map their native errors into these variants; the engine
/// propagates them unchanged to the caller, whose transaction boundary
/// decides what to roll back. No retry happens inside the core.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An error from the underlying storage backend.
    #[error("storage error: {0}")]
    Storage(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
