use serde::{Deserialize, Serialize};

/// Default target number of retained records per subject instance.
pub const DEFAULT_REVISION_LIMIT: usize = 500;

/// Default maximum number of records deleted in one retention pass.
pub const DEFAULT_CLEANUP_BATCH: usize = 64;

/// Per-subject-type retention configuration.
///
/// The limit is a soft target: bounding each cleanup pass to `cleanup_batch`
/// deletions bounds the worst-case per-write deletion cost, so the live
/// count for one subject may transiently reach `limit + cleanup_batch - 1`
/// between writes and converges toward `limit` as further writes trigger
/// cleanup passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Target maximum number of retained records per subject instance.
    pub limit: usize,
    /// Maximum number of records deleted in one retention pass.
    pub cleanup_batch: usize,
}

impl RetentionPolicy {
    /// Create a policy with the default limit and batch size.
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_REVISION_LIMIT,
            cleanup_batch: DEFAULT_CLEANUP_BATCH,
        }
    }

    /// Override the retention limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Override the cleanup batch size.
    #[must_use]
    pub fn with_cleanup_batch(mut self, cleanup_batch: usize) -> Self {
        self.cleanup_batch = cleanup_batch;
        self
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new()
    }
}
