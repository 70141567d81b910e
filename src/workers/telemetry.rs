// Periodic worker pool stats logger.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use crate::cache::Storage;
use crate::metrics;

use super::counters::Counters;
use super::lanes::Lanes;

/// Logs and exports pool stats every `each` until cancelled. Counts gathered
/// since the last tick are flushed once more on the way out.
pub async fn logger(
    shutdown_token: CancellationToken,
    counters: Arc<Counters>,
    lanes: Arc<Lanes>,
    storage: Arc<dyn Storage>,
    w_num_active: Arc<AtomicI64>,
    each: Duration,
) {
    let mut ticker = interval(each);

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => {
                flush(&counters, &lanes, storage.as_ref(), &w_num_active);
                tracing::debug!(component = "workers", "logger stopped");
                return;
            }
            _ = ticker.tick() => {
                flush(&counters, &lanes, storage.as_ref(), &w_num_active);
            }
        }
    }
}

/// Drains the counters into metrics and writes one stats line.
pub fn flush(counters: &Counters, lanes: &Lanes, storage: &dyn Storage, w_num_active: &AtomicI64) {
    let workers = w_num_active.load(Ordering::Relaxed);
    let (queued_high, queued_low) = lanes.depth();
    let cache_len = storage.len();
    let (fetched, failed, persist_failed, taken_high, taken_low) = counters.reset();

    metrics::add_worker_stat_counters(fetched, failed, persist_failed);
    metrics::set_lane_depth(queued_high, queued_low);
    metrics::set_cache_length(cache_len);
    metrics::set_workers_active(workers);

    tracing::info!(
        component = "workers",
        replicas = workers,
        fetched,
        errors = failed,
        persist_errors = persist_failed,
        taken_high,
        taken_low,
        queued_high,
        queued_low,
        cache_len,
        "worker pool stats"
    );
}
