//! Client-side query cache abstraction for the Gardenia client.
//!
//! Cached remote data is grouped under named [`Target`]s. Invalidating a
//! target marks every cached result under it stale so the next read goes
//! back to the authoritative remote source. Invalidation is a pure
//! side-effecting signal; it performs no network I/O of its own.
//!
//! [`Target`]: gardenia_types::Target

mod error;
mod memory;
mod store;

pub use error::{CacheError, CacheResult};
pub use memory::MemoryQueryCache;
pub use store::QueryCache;
