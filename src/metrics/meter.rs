use crate::workers::Priority;

// Metric name constants
pub const REQUESTS: &str = "pagefetch_requests_total";
pub const HITS: &str = "pagefetch_cache_hits_total";
pub const MISSES: &str = "pagefetch_cache_misses_total";
pub const QUEUED: &str = "pagefetch_queued_total";
pub const FETCHED: &str = "pagefetch_fetched_total";
pub const FETCH_FAILURES: &str = "pagefetch_fetch_failures_total";
pub const PERSIST_FAILURES: &str = "pagefetch_persist_failures_total";
pub const CACHE_LENGTH: &str = "pagefetch_cache_length";
pub const LANE_DEPTH: &str = "pagefetch_lane_depth";
pub const WORKERS_ACTIVE: &str = "pagefetch_workers_active";
pub const PANICS: &str = "pagefetch_handler_panics_total";

pub fn inc_requests() {
    metrics::counter!(REQUESTS).increment(1);
}

pub fn inc_hits() {
    metrics::counter!(HITS).increment(1);
}

pub fn inc_misses() {
    metrics::counter!(MISSES).increment(1);
}

pub fn inc_queued(priority: Priority) {
    metrics::counter!(QUEUED, "lane" => priority.as_str()).increment(1);
}

/// Adds the worker pool results collected since the last telemetry tick.
pub fn add_worker_stat_counters(fetched: i64, fetch_failed: i64, persist_failed: i64) {
    metrics::counter!(FETCHED).increment(fetched.max(0) as u64);
    metrics::counter!(FETCH_FAILURES).increment(fetch_failed.max(0) as u64);
    metrics::counter!(PERSIST_FAILURES).increment(persist_failed.max(0) as u64);
}

pub fn set_cache_length(len: usize) {
    metrics::gauge!(CACHE_LENGTH).set(len as f64);
}

pub fn set_lane_depth(high: usize, low: usize) {
    metrics::gauge!(LANE_DEPTH, "lane" => Priority::High.as_str()).set(high as f64);
    metrics::gauge!(LANE_DEPTH, "lane" => Priority::Low.as_str()).set(low as f64);
}

pub fn set_workers_active(n: i64) {
    metrics::gauge!(WORKERS_ACTIVE).set(n as f64);
}

pub fn inc_panics() {
    metrics::counter!(PANICS).increment(1);
}
