// Package upstream defines the outbound transport seam.

use bytes::Bytes;
use std::time::Duration;

/// Errors a single transport attempt can produce.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("build request: {0}")]
    Build(#[from] hyper::http::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
    #[error("reading body of {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: hyper::Error,
    },
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Transport performs one HTTP GET against a URL.
///
/// Any response that arrives in full is a success regardless of status code;
/// only connection and body-read failures are errors.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Response, TransportError>;
}

/// HTTP response received from upstream.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
