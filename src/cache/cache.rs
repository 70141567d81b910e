// Sharded page cache with age-based freshness.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::{Config, ConfigTrait};

use super::entry::CacheEntry;
use super::shard::{Lookup, Shard};

/// Storage is the interface the dispatcher and workers use to reach cached pages.
pub trait Storage: Send + Sync {
    /// Returns the payload for key and whether it is still fresh.
    fn lookup(&self, key: &str) -> Lookup;

    /// Inserts or overwrites key with last-served set to now.
    fn store(&self, key: &str, payload: Bytes);

    /// Sets last-served of key to now without changing the payload.
    fn touch(&self, key: &str) -> bool;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory page cache split into independently locked shards.
///
/// Entries are never evicted: a stale entry stays until a later fetch of the
/// same URL supersedes it.
pub struct PageCache {
    shards: Vec<Shard>,
    mask: usize,
    ttl: Duration,
}

impl PageCache {
    /// Creates a cache with `shards` rounded up to a power of two.
    pub fn new(ttl: Duration, shards: usize) -> Self {
        let n = shards.max(1).next_power_of_two();
        Self {
            shards: (0..n).map(|_| Shard::new()).collect(),
            mask: n - 1,
            ttl,
        }
    }

    pub fn from_config(cfg: &Config) -> Arc<Self> {
        Arc::new(Self::new(cfg.cache_ttl(), cfg.cache_shards()))
    }

    fn shard(&self, key: &str) -> &Shard {
        let idx = (xxh3_64(key.as_bytes()) as usize) & self.mask;
        &self.shards[idx]
    }

    /// Unix nanoseconds of the last store or touch of key.
    pub fn last_served(&self, key: &str) -> Option<i64> {
        self.shard(key).last_served(key)
    }

    /// Rewrites the last-served timestamp of key (used in tests).
    #[cfg(test)]
    pub(crate) fn set_last_served_for_tests(&self, key: &str, ts: i64) -> bool {
        self.shard(key)
            .with_entry_mut(key, |entry| entry.set_last_served_for_tests(ts))
    }
}

impl Storage for PageCache {
    fn lookup(&self, key: &str) -> Lookup {
        self.shard(key).lookup(key, self.ttl)
    }

    fn store(&self, key: &str, payload: Bytes) {
        self.shard(key).store(key.to_string(), CacheEntry::new(payload));
    }

    fn touch(&self, key: &str) -> bool {
        self.shard(key).touch(key)
    }

    fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }
}
