//! Refresh policy configuration.

use gardenia_types::Target;
use std::time::Duration;

/// Configuration for the refresh scheduler.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// The refresh target set. Every target is invalidated on every refresh.
    pub targets: Vec<Target>,
    /// Settle delay after a became-online transition, so a flaky connectivity
    /// blip does not fire a refresh.
    pub reconnect_delay: Duration,
    /// Delay before the initial refresh at startup, letting the platform's
    /// connectivity state stabilize.
    pub startup_delay: Duration,
    /// Fixed retry interval after a failed refresh. Retries never compound.
    pub retry_delay: Duration,
    /// How old the last successful refresh may be before a reconnect
    /// triggers a new one.
    pub stale_after: Duration,
    /// Heartbeat period: bounds worst-case staleness absent any trigger.
    pub heartbeat_interval: Duration,
    /// Settle pause after all targets have been invalidated, before the
    /// refresh finalizes.
    pub finalize_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            targets: Target::ALL.to_vec(),
            reconnect_delay: Duration::from_secs(1),
            startup_delay: Duration::from_secs(2),
            retry_delay: Duration::from_secs(5),
            stale_after: Duration::from_secs(30),
            heartbeat_interval: Duration::from_secs(300),
            finalize_delay: Duration::from_millis(500),
        }
    }
}
