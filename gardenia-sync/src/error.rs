//! Error types for the sync layer.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The scheduler actor has stopped; the handle is no longer usable.
    #[error("sync scheduler stopped")]
    SchedulerStopped,

    /// A refresh cycle failed for one or more targets. Carries the aggregate
    /// description stored on the status snapshot.
    #[error("refresh failed: {0}")]
    Refresh(String),
}
