//! End-to-end tests for pagefetch.
//!
//! Cases drive the real dispatcher, worker pool, cache and disk writer with
//! scripted upstream transports, and the HTTP router in-process.

mod cases_download_endpoint_test;

pub mod support;
