// Shard of the page cache.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

use super::entry::CacheEntry;

/// Snapshot of a single entry taken under the shard lock.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub payload: Option<bytes::Bytes>,
    pub found: bool,
    pub fresh: bool,
}

impl Lookup {
    pub(crate) fn miss() -> Self {
        Self {
            payload: None,
            found: false,
            fresh: false,
        }
    }
}

/// Shard is an independent segment of the page cache.
/// Payload and timestamp of an entry only change together under the write lock.
pub struct Shard {
    items: RwLock<HashMap<String, CacheEntry>>,
}

impl Shard {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn lookup(&self, key: &str, ttl: Duration) -> Lookup {
        let items = self.items.read();
        match items.get(key) {
            Some(entry) => Lookup {
                payload: Some(entry.payload().clone()),
                found: true,
                fresh: entry.is_fresh(ttl),
            },
            None => Lookup::miss(),
        }
    }

    pub fn last_served(&self, key: &str) -> Option<i64> {
        self.items.read().get(key).map(CacheEntry::last_served)
    }

    /// Inserts or replaces the entry for key. Last writer wins.
    pub fn store(&self, key: String, entry: CacheEntry) {
        self.items.write().insert(key, entry);
    }

    /// Refreshes the timestamp of an existing entry.
    /// Returns false when the key is absent.
    pub fn touch(&self, key: &str) -> bool {
        match self.items.write().get_mut(key) {
            Some(entry) => {
                entry.touch();
                true
            }
            None => false,
        }
    }

    /// Runs f against the entry for key, if any (used in tests).
    #[cfg(test)]
    pub(crate) fn with_entry_mut<F: FnOnce(&mut CacheEntry)>(&self, key: &str, f: F) -> bool {
        match self.items.write().get_mut(key) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }
}
