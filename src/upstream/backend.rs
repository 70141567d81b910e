use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::backend_hyper_impl::make_get_request;
use super::upstream::{Response, Transport, TransportError};
use crate::config::{Config, ConfigTrait};
use crate::http::client::{create_client, HyperClient};

/// Transport backed by a pooled hyper client.
pub struct HttpTransport {
    client: HyperClient,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(cfg: &Config) -> Arc<Self> {
        Arc::new(Self {
            client: create_client(),
            timeout: cfg.upstream_timeout(),
        })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Response, TransportError> {
        let (status, body) = make_get_request(&self.client, url, self.timeout).await?;
        debug!(
            component = "upstream",
            url = %url,
            status,
            size = body.len(),
            "upstream responded"
        );
        Ok(Response::new(status, body))
    }
}
