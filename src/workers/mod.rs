// Request dispatch and the worker pool that executes downloads.

pub mod counters;
pub mod dispatcher;
pub mod job;
pub mod lanes;
pub mod pool;
pub mod request;
pub mod telemetry;

#[cfg(test)]
mod dispatcher_test;

pub use dispatcher::{Admission, Dispatcher};
pub use job::Job;
pub use lanes::Lanes;
pub use pool::WorkerPool;
pub use request::{clamp_retry_limit, Priority, WorkRequest, MAX_RETRY_LIMIT};
