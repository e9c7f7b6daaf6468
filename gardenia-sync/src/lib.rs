//! Connectivity-aware cache refresh for the Gardenia client.
//!
//! Keeps the client's cached remote data fresh without ever blocking the UI:
//! when connectivity returns, when data is known to have changed, and on a
//! periodic heartbeat, every refresh target is marked stale so consumers
//! refetch from the remote source.
//!
//! # Architecture
//!
//! - **ConnectivityMonitor**: adapts the platform's online/offline signal
//!   into edge-triggered notifications.
//! - **SyncScheduler**: a single actor task that owns the [`SyncStatus`]
//!   snapshot and serializes every mutation through one command queue.
//!   Timers (reconnect settle, retry, heartbeat) are spawned tasks that feed
//!   commands back into the same queue, so state updates never interleave.
//! - **Cache invalidation**: a task per target joined with a barrier; the
//!   refresh reports an aggregate failure if any target failed.
//!
//! # Policy
//!
//! 1. On reconnect: refresh after a settle delay if anything is pending, no
//!    refresh has ever completed, or the last success is stale.
//! 2. On going offline: mark pending; never refresh while offline.
//! 3. Heartbeat: refresh every five minutes while online, bounding staleness.
//! 4. On startup: one initial refresh shortly after start while online.
//!
//! Failures set a human-readable error on the status and retry at a fixed
//! interval for as long as the host stays online. At most one refresh is ever
//! in flight.
//!
//! # Example
//!
//! ```
//! use gardenia_sync::{ConnectivityMonitor, SyncConfig};
//!
//! let monitor = ConnectivityMonitor::default();
//! assert!(monitor.is_online());
//!
//! let config = SyncConfig::default();
//! assert_eq!(config.retry_delay.as_secs(), 5);
//! ```
//!
//! [`SyncStatus`]: gardenia_types::SyncStatus

mod config;
mod connectivity;
mod error;
mod scheduler;

pub use config::SyncConfig;
pub use connectivity::ConnectivityMonitor;
pub use error::{SyncError, SyncResult};
pub use scheduler::{spawn_scheduler, SyncHandle};

pub use gardenia_types::{SyncStatus, Target};
