//! Panic recovery middleware.

use axum::{
    body::Body,
    http::{Response, StatusCode},
    Router,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::metrics;

fn panic_message(err: &(dyn Any + Send)) -> &str {
    if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    metrics::inc_panics();
    error!(
        component = "http",
        event = "panic_recovered",
        panic = panic_message(err.as_ref()),
        "handler panicked"
    );

    let mut response = Response::new(Body::from("internal server error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

/// PanicRecoverMiddleware turns a panicking handler into a 500 response.
pub struct PanicRecoverMiddleware;

impl PanicRecoverMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PanicRecoverMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Middleware for PanicRecoverMiddleware {
    fn apply(&self, router: Router) -> Router {
        router.layer(CatchPanicLayer::custom(handle_panic))
    }
}
