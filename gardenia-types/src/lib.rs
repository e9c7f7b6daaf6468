//! Shared type definitions for the Gardenia client.
//!
//! This crate defines the plugin-agnostic types used by the cache and sync
//! layers and read by UI consumers:
//! - Refresh targets (the named data collections the client caches)
//! - The sync status snapshot published by the refresh scheduler
//!
//! Domain models (products, rentals, customers, page sections) belong to the
//! screens that render them, not here.

mod status;
mod target;

pub use status::SyncStatus;
pub use target::Target;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown refresh target: {0}")]
    UnknownTarget(String),
}
