// Cached page entry.

use bytes::Bytes;
use std::time::Duration;

use crate::time;

/// A fetched page together with the moment it was last stored or served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    payload: Bytes,
    last_served: i64,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(payload: Bytes) -> Self {
        Self {
            payload,
            last_served: time::unix_nano(),
        }
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Unix nanoseconds of the last store or touch.
    pub fn last_served(&self) -> i64 {
        self.last_served
    }

    /// Refreshes the last-served timestamp, keeping the payload.
    pub fn touch(&mut self) {
        self.last_served = time::unix_nano();
    }

    /// Fresh while strictly less than `ttl` has elapsed since the last serve.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        time::since_nano(self.last_served) < ttl
    }

    /// Helper to force a specific last-served timestamp (used in tests).
    #[cfg(test)]
    pub fn set_last_served_for_tests(&mut self, ts: i64) {
        self.last_served = ts;
    }
}
