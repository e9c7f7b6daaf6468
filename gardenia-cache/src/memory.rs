//! In-memory query cache.
//!
//! Staleness is tracked with a per-target generation counter. Every entry
//! remembers the generation it was written under; invalidating a target bumps
//! the counter, so reads of older entries come back empty and force the
//! consumer to refetch. Entries are not evicted eagerly — a stale entry is
//! simply invisible until overwritten.

use crate::error::CacheResult;
use crate::store::QueryCache;
use async_trait::async_trait;
use gardenia_types::Target;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Shard {
    generation: u64,
    entries: HashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    generation: u64,
    value: Value,
}

/// An in-memory [`QueryCache`] keyed by target and query key.
#[derive(Debug, Default)]
pub struct MemoryQueryCache {
    shards: RwLock<HashMap<Target, Shard>>,
}

impl MemoryQueryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a query result under `target`/`key` at the target's current
    /// generation.
    pub async fn put(&self, target: Target, key: impl Into<String>, value: Value) {
        let mut shards = self.shards.write().await;
        let shard = shards.entry(target).or_default();
        let generation = shard.generation;
        shard.entries.insert(key.into(), Entry { generation, value });
    }

    /// Returns the cached result for `target`/`key`, or `None` if it was
    /// never stored or was written before the target's current generation.
    pub async fn get(&self, target: Target, key: &str) -> Option<Value> {
        let shards = self.shards.read().await;
        let shard = shards.get(&target)?;
        let entry = shard.entries.get(key)?;
        if entry.generation < shard.generation {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Returns the current generation for `target`. Consumers that hold data
    /// outside the cache can pair it with the generation they read and
    /// compare later.
    pub async fn generation(&self, target: Target) -> u64 {
        self.shards
            .read()
            .await
            .get(&target)
            .map(|s| s.generation)
            .unwrap_or(0)
    }
}

#[async_trait]
impl QueryCache for MemoryQueryCache {
    async fn invalidate(&self, target: Target) -> CacheResult<()> {
        let mut shards = self.shards.write().await;
        shards.entry(target).or_default().generation += 1;
        Ok(())
    }
}
