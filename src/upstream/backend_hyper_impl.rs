//! Hyper-based implementation of a single upstream GET.

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty};
use hyper::{Method, Request, Uri};
use std::time::Duration;
use tokio::time::timeout;

use super::upstream::TransportError;
use crate::http::client::HyperClient;

/// Makes a GET request and reads the whole body.
/// The timeout covers connecting, headers and body. The response and its
/// connection are released before returning, on success and on error.
pub async fn make_get_request(
    client: &HyperClient,
    url: &str,
    timeout_duration: Duration,
) -> Result<(u16, Bytes), TransportError> {
    let uri: Uri = url
        .parse()
        .map_err(|_| TransportError::InvalidUrl(url.to_string()))?;

    let empty: BoxBody<Bytes, hyper::Error> = Empty::<Bytes>::new()
        .map_err(|never: std::convert::Infallible| match never {})
        .boxed();

    let req = Request::builder().method(Method::GET).uri(uri).body(empty)?;

    let exchange = async {
        let response = client
            .request(req)
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let (_, body_stream) = response.into_parts();
        let body = body_stream
            .collect()
            .await
            .map_err(|source| TransportError::Body {
                url: url.to_string(),
                source,
            })?
            .to_bytes();

        Ok::<_, TransportError>((status, body))
    };

    match timeout(timeout_duration, exchange).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                component = "upstream",
                url = %url,
                timeout = ?timeout_duration,
                "request timed out"
            );
            Err(TransportError::Timeout {
                url: url.to_string(),
                timeout: timeout_duration,
            })
        }
    }
}
