//! Cached wall clock used for cache freshness checks.
//!
//! A ticker task refreshes the cached value at a fixed resolution so hot paths
//! avoid a syscall per lookup. Until the ticker runs (or after it stops) the
//! functions read the system clock directly.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;

static NOW_UNIX: AtomicI64 = AtomicI64::new(0);
static TICKING: AtomicBool = AtomicBool::new(false);

fn system_unix_nano() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

/// Starts the time caching ticker.
/// Cancel the returned token to stop it.
pub fn start(resolution: Duration) -> CancellationToken {
    NOW_UNIX.store(system_unix_nano(), Ordering::Relaxed);
    TICKING.store(true, Ordering::Release);

    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(resolution);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    NOW_UNIX.store(system_unix_nano(), Ordering::Relaxed);
                }
                _ = token_clone.cancelled() => {
                    TICKING.store(false, Ordering::Release);
                    break;
                }
            }
        }
    });

    token
}

/// Returns the current time as Unix nanoseconds.
pub fn unix_nano() -> i64 {
    if TICKING.load(Ordering::Acquire) {
        NOW_UNIX.load(Ordering::Relaxed)
    } else {
        system_unix_nano()
    }
}

/// Returns the time elapsed since the given Unix nanosecond timestamp.
/// Timestamps in the future yield zero.
pub fn since_nano(ts: i64) -> Duration {
    let delta = unix_nano().saturating_sub(ts);
    if delta <= 0 {
        Duration::ZERO
    } else {
        Duration::from_nanos(delta as u64)
    }
}
