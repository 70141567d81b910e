// Package api provides the runtime stats controller.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::http::Controller;
use crate::workers::{Dispatcher, WorkerPool};

pub const STATS_PATH: &str = "/pagefetch/stats";

#[derive(Debug, Serialize)]
pub struct Stats {
    pub cache_entries: usize,
    pub queued_high: usize,
    pub queued_low: usize,
    pub workers_active: i64,
}

/// StatsController exposes a point-in-time snapshot of cache size, lane
/// depths and live workers.
pub struct StatsController {
    dispatcher: Arc<Dispatcher>,
    pool: Arc<WorkerPool>,
}

impl StatsController {
    pub fn new(dispatcher: Arc<Dispatcher>, pool: Arc<WorkerPool>) -> Self {
        Self { dispatcher, pool }
    }

    fn snapshot(&self) -> Stats {
        let (queued_high, queued_low) = self.dispatcher.lanes().depth();
        Stats {
            cache_entries: self.dispatcher.storage().len(),
            queued_high,
            queued_low,
            workers_active: self.pool.replicas(),
        }
    }
}

impl Controller for StatsController {
    fn add_route(&self, router: Router) -> Router {
        let controller = Arc::new(Self {
            dispatcher: self.dispatcher.clone(),
            pool: self.pool.clone(),
        });
        router.route(
            STATS_PATH,
            get(move || {
                let controller = controller.clone();
                async move { Json(controller.snapshot()) }
            }),
        )
    }
}
