// HTTP API controllers.

pub mod controller;
pub mod download;
pub mod metrics;
pub mod probe;
pub mod stats;


pub use controller::Controller;
pub use download::DownloadController;
pub use metrics::PrometheusMetricsController;
pub use probe::LivenessProbeController;
pub use stats::StatsController;
