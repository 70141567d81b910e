#[path = "shared/time/mod.rs"]
pub mod time;
#[cfg(test)]
mod tests;

pub mod app;
pub mod cache;
pub mod config;
pub mod controller;
pub mod http;
pub mod metrics;
pub mod middleware;
pub mod persistence;
pub mod shutdown;
pub mod upstream;
pub mod workers;
