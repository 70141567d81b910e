// Common helpers for the pipeline and endpoint cases.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::app::App;
use crate::config::{self, Cache, Config, Workers};
use crate::upstream::Transport;

/// Running application rooted in a temporary cache directory.
pub struct TestApp {
    pub app: App,
    pub token: CancellationToken,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn close(self) {
        self.app.close().await;
    }
}

/// Test config with `workers` replicas and the cache dir pointed at dir.
pub fn test_config(dir: &TempDir, workers: usize) -> Config {
    let mut cfg = config::new_test_config();
    cfg.pagefetch.cache = Some(Cache {
        ttl: Some(config::DEFAULT_CACHE_TTL),
        shards: Some(8),
        dir: Some(dir.path().join("pages")),
    });
    cfg.pagefetch.workers = Some(Workers {
        replicas: Some(workers),
        telemetry_interval: Some(Duration::from_secs(60)),
    });
    cfg
}

pub async fn start_app(transport: Arc<dyn Transport>, workers: usize) -> TestApp {
    let dir = TempDir::new().unwrap();
    let token = CancellationToken::new();
    let cfg = test_config(&dir, workers);
    let app = App::with_transport(token.clone(), cfg, transport).await.unwrap();
    TestApp { app, token, dir }
}

/// Polls cond every few milliseconds until it holds or timeout elapses.
pub async fn wait_until<F: Fn() -> bool>(timeout: Duration, cond: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Sends a GET through the router without binding a socket.
pub async fn get(router: &Router, uri: &str) -> (StatusCode, Bytes) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}
