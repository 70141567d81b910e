// Package api provides liveness probe controller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::http::Controller;
use crate::workers::WorkerPool;

pub const PROBE_PATH: &str = "/healthz";

const SUCCESS_RESPONSE: &str = r#"{
  "status": 200,
  "message": "workers are up"
}"#;

const FAILED_RESPONSE: &str = r#"{
  "status": 503,
  "message": "no live workers"
}"#;

/// LivenessProbeController reports whether the worker pool can still make
/// progress on queued downloads.
pub struct LivenessProbeController {
    pool: Arc<WorkerPool>,
}

impl LivenessProbeController {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self { pool }
    }

    fn probe(&self) -> Response {
        if self.pool.is_alive() {
            (StatusCode::OK, SUCCESS_RESPONSE).into_response()
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, FAILED_RESPONSE).into_response()
        }
    }
}

impl Clone for LivenessProbeController {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

impl Controller for LivenessProbeController {
    fn add_route(&self, router: Router) -> Router {
        let probe_controller = self.clone();
        router.route(
            PROBE_PATH,
            get(move || {
                let controller = probe_controller.clone();
                async move { controller.probe() }
            }),
        )
    }
}
