//! Upstream fetching: the HTTP transport and the retrying downloader.

pub mod backend;
mod backend_hyper_impl;
pub mod downloader;
pub mod upstream;


pub use backend::HttpTransport;
pub use downloader::{Downloader, FetchError};
pub use upstream::{Response, Transport, TransportError};
