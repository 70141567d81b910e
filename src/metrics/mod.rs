//! Prometheus metrics.
//!
//! Counters are recorded through the `metrics` facade; the Prometheus
//! recorder is installed at startup and rendered by the metrics controller.

pub mod meter;

pub use meter::*;
