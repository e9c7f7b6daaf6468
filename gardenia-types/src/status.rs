//! The sync status snapshot.
//!
//! Process-lifetime, in-memory state: created once at scheduler startup,
//! mutated exclusively by the scheduler actor, observed read-only by UI
//! consumers. It is never persisted and resets on restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the refresh scheduler's state.
///
/// `is_syncing` and `pending_sync` are independent: a refresh can be pending
/// while none is running, or running with nothing pending beyond the
/// in-progress one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Last known connectivity state.
    pub is_online: bool,
    /// True while a refresh is in flight.
    pub is_syncing: bool,
    /// When the last successful refresh completed.
    pub last_sync_time: Option<DateTime<Utc>>,
    /// True when a refresh was requested or needed but has not completed
    /// (set on going offline, or on failure).
    pub pending_sync: bool,
    /// Description of the most recent failure. Set only in the failure
    /// transition; cleared by an explicit clear or the start of a new attempt.
    pub sync_error: Option<String>,
}

impl SyncStatus {
    /// Creates the startup snapshot for the given connectivity state.
    #[must_use]
    pub fn new(is_online: bool) -> Self {
        Self {
            is_online,
            is_syncing: false,
            last_sync_time: None,
            pending_sync: false,
            sync_error: None,
        }
    }
}

impl Default for SyncStatus {
    fn default() -> Self {
        // Absence of a connectivity signal is treated as online.
        Self::new(true)
    }
}
