// Fetch-with-retry executor.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::upstream::{Transport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("downloading {url} failed after {attempts} attempt(s): {source}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        source: TransportError,
    },
}

/// Downloader runs a GET against the transport, retrying failed attempts.
pub struct Downloader {
    transport: Arc<dyn Transport>,
    backoff: Duration,
}

impl Downloader {
    /// `backoff` is slept between attempts; zero retries immediately.
    pub fn new(transport: Arc<dyn Transport>, backoff: Duration) -> Self {
        Self { transport, backoff }
    }

    /// Fetches url with at most `retry_limit + 1` attempts.
    /// Returns the body of the first successful attempt, or the last error.
    pub async fn fetch(&self, url: &str, retry_limit: u8) -> Result<Bytes, FetchError> {
        let max_attempts = u32::from(retry_limit) + 1;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.transport.get(url).await {
                Ok(resp) => {
                    if !resp.is_success() {
                        warn!(
                            component = "downloader",
                            event = "non_success_status",
                            url = %url,
                            status = resp.status,
                            "upstream answered with an error status, keeping body as is"
                        );
                    }
                    debug!(
                        component = "downloader",
                        event = "fetched",
                        url = %url,
                        status = resp.status,
                        attempt,
                        "page downloaded"
                    );
                    return Ok(resp.body);
                }
                Err(err) if attempt >= max_attempts => {
                    return Err(FetchError::Exhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        source: err,
                    });
                }
                Err(err) => {
                    warn!(
                        component = "downloader",
                        event = "attempt_failed",
                        url = %url,
                        attempt,
                        max_attempts,
                        error = %err,
                        "fetch attempt failed, retrying"
                    );
                    if !self.backoff.is_zero() {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
            }
        }
    }
}
