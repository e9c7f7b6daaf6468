//! The query cache capability.
//!
//! The refresh scheduler depends only on this trait, never on a concrete
//! cache: "mark everything under this target stale" is the whole contract.

use crate::error::CacheResult;
use async_trait::async_trait;
use gardenia_types::Target;

/// A cache of remote query results, grouped by [`Target`].
#[async_trait]
pub trait QueryCache: Send + Sync {
    /// Marks every cached result under `target` stale, so the next read of
    /// that target refetches from the authoritative remote source.
    ///
    /// Failures are returned, never swallowed — the scheduler needs to
    /// observe them in its settle step.
    async fn invalidate(&self, target: Target) -> CacheResult<()>;
}
