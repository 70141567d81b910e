// Package http provides Middleware interface.

use axum::Router;

/// Middleware wraps a router with one layer of request processing.
pub trait Middleware: Send + Sync {
    fn apply(&self, router: Router) -> Router;
}
