// HTTP controller trait for route registration.

use axum::Router;

/// A controller owns one or more endpoints and registers them on the shared
/// router when the server is built.
///
/// ```rust
/// # use axum::{routing::get, Router};
/// # async fn stats() -> &'static str { "{}" }
/// let router: Router<()> = Router::new().route("/pagefetch/stats", get(stats));
/// # let _ = router;
/// ```
pub trait Controller: Send + Sync {
    fn add_route(&self, router: Router) -> Router;
}
