//! HTTP surface: /download, /healthz and /pagefetch/stats.

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use bytes::Bytes;
    use std::time::Duration;

    use crate::cache::Storage;
    use crate::tests::support::{get, start_app, wait_until, FlakyTransport};

    const WAIT: Duration = Duration::from_secs(5);
    const PAGE_URL: &str = "http://a.com/p";
    const PAGE_QUERY: &str = "/download?url=http%3A%2F%2Fa.com%2Fp&retry_limit=1&customer_paying=true";

    #[tokio::test]
    async fn test_miss_then_hit() {
        let transport = FlakyTransport::new(0, Bytes::from_static(b"<html>A</html>"));
        let t = start_app(transport.clone(), 2).await;
        let router = t.app.router();

        let (status, body) = get(&router, PAGE_QUERY).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body.is_empty());

        let cache = t.app.cache().clone();
        assert!(wait_until(WAIT, || cache.lookup(PAGE_URL).fresh).await);

        let (status, body) = get(&router, PAGE_QUERY).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"<html>A</html>"));
        assert_eq!(transport.calls(), 1);

        t.close().await;
    }

    #[tokio::test]
    async fn test_missing_or_empty_url_is_rejected() {
        let transport = FlakyTransport::always_failing();
        let t = start_app(transport.clone(), 1).await;
        let router = t.app.router();

        for uri in ["/download", "/download?url=", "/download?retry_limit=3&customer_paying=1"] {
            let (status, _) = get(&router, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(transport.calls(), 0);
        assert!(t.app.cache().is_empty());

        t.close().await;
    }

    #[tokio::test]
    async fn test_invalid_retry_limit_means_single_attempt() {
        let transport = FlakyTransport::always_failing();
        let t = start_app(transport.clone(), 1).await;
        let router = t.app.router();

        let (status, _) = get(&router, "/download?url=http://x/&retry_limit=lots&customer_paying=maybe").await;
        assert_eq!(status, StatusCode::ACCEPTED);

        assert!(wait_until(WAIT, || transport.calls() >= 1).await);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(transport.calls(), 1);

        t.close().await;
    }

    #[tokio::test]
    async fn test_repeated_parameters_use_first_value() {
        let transport = FlakyTransport::always_failing();
        let t = start_app(transport.clone(), 1).await;
        let router = t.app.router();

        let (status, _) = get(
            &router,
            "/download?url=http://x/&retry_limit=1&retry_limit=2&customer_paying=1&customer_paying=0",
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        assert!(wait_until(WAIT, || transport.calls() >= 2).await);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(transport.calls(), 2);

        t.close().await;
    }

    #[tokio::test]
    async fn test_retry_limit_is_clamped_to_ten() {
        let transport = FlakyTransport::always_failing();
        let t = start_app(transport.clone(), 1).await;
        let router = t.app.router();

        let (status, _) = get(&router, "/download?url=http://x/&retry_limit=50").await;
        assert_eq!(status, StatusCode::ACCEPTED);

        assert!(wait_until(WAIT, || transport.calls() >= 11).await);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(transport.calls(), 11);

        t.close().await;
    }

    #[tokio::test]
    async fn test_healthz_follows_worker_pool() {
        let t = start_app(FlakyTransport::always_failing(), 2).await;
        let router = t.app.router();

        let (status, _) = get(&router, "/healthz").await;
        assert_eq!(status, StatusCode::OK);

        t.app.pool().close().await;

        let (status, _) = get(&router, "/healthz").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = get(&router, PAGE_QUERY).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_stats_snapshot() {
        let transport = FlakyTransport::new(0, Bytes::from_static(b"s"));
        let t = start_app(transport, 2).await;
        let router = t.app.router();

        get(&router, PAGE_QUERY).await;
        let cache = t.app.cache().clone();
        assert!(wait_until(WAIT, || cache.len() == 1).await);

        let (status, body) = get(&router, "/pagefetch/stats").await;
        assert_eq!(status, StatusCode::OK);

        let stats: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(stats["cache_entries"], 1);
        assert_eq!(stats["queued_high"], 0);
        assert_eq!(stats["queued_low"], 0);
        assert_eq!(stats["workers_active"], 2);

        t.close().await;
    }
}
