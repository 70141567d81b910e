// Counters for the worker pool.

use std::sync::atomic::{AtomicI64, Ordering};

/// Counters for executed work requests, reset on every telemetry tick.
pub struct Counters {
    /// Pages downloaded and cached.
    pub fetched: AtomicI64,
    /// Requests dropped after exhausting retries.
    pub fetch_failed: AtomicI64,
    /// Pages cached but not written to disk.
    pub persist_failed: AtomicI64,
    /// Requests taken from the high lane, whatever their outcome.
    pub taken_high: AtomicI64,
    /// Requests taken from the low lane, whatever their outcome.
    pub taken_low: AtomicI64,
}

impl Counters {
    pub fn new() -> Self {
        Self {
            fetched: AtomicI64::new(0),
            fetch_failed: AtomicI64::new(0),
            persist_failed: AtomicI64::new(0),
            taken_high: AtomicI64::new(0),
            taken_low: AtomicI64::new(0),
        }
    }

    /// Resets all counters and returns their previous values as
    /// (fetched, fetch_failed, persist_failed, taken_high, taken_low).
    pub fn reset(&self) -> (i64, i64, i64, i64, i64) {
        let fetched = self.fetched.swap(0, Ordering::Relaxed);
        let failed = self.fetch_failed.swap(0, Ordering::Relaxed);
        let persist_failed = self.persist_failed.swap(0, Ordering::Relaxed);
        let high = self.taken_high.swap(0, Ordering::Relaxed);
        let low = self.taken_low.swap(0, Ordering::Relaxed);
        (fetched, failed, persist_failed, high, low)
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}
