// HTTP server implementation for the pagefetch application.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::controller;
use crate::http::{Controller, Middleware};
use crate::middleware::{PanicRecoverMiddleware, TraceMiddleware};
use crate::workers::{Dispatcher, WorkerPool};

/// Http is the app-facing view of the API server.
#[async_trait::async_trait]
pub trait Http: Send + Sync {
    async fn listen_and_serve(&self) -> Result<()>;
    fn router(&self) -> Router;
}

/// HttpServer wraps the generic server with this service's controllers.
pub struct HttpServer {
    server: Arc<crate::http::HttpServer>,
}

impl HttpServer {
    pub fn new(
        ctx: CancellationToken,
        cfg: Config,
        dispatcher: Arc<Dispatcher>,
        pool: Arc<WorkerPool>,
    ) -> Self {
        let controllers = Self::controllers(dispatcher, pool);
        let middlewares = Self::middlewares();

        Self {
            server: crate::http::HttpServer::new(ctx, cfg, controllers, middlewares),
        }
    }

    fn controllers(dispatcher: Arc<Dispatcher>, pool: Arc<WorkerPool>) -> Vec<Box<dyn Controller>> {
        vec![
            // Main handler: cache hit or enqueue
            Box::new(controller::DownloadController::new(dispatcher.clone())),
            // Worker pool liveness
            Box::new(controller::LivenessProbeController::new(pool.clone())),
            // Cache size, lane depths, live workers
            Box::new(controller::StatsController::new(dispatcher, pool)),
            // Prometheus scrape endpoint
            Box::new(controller::PrometheusMetricsController::new()),
        ]
    }

    /// Executed in list order, the first one is outermost.
    fn middlewares() -> Vec<Box<dyn Middleware>> {
        vec![
            Box::new(PanicRecoverMiddleware::new()),
            Box::new(TraceMiddleware::new()),
        ]
    }
}

#[async_trait::async_trait]
impl Http for HttpServer {
    async fn listen_and_serve(&self) -> Result<()> {
        self.server.listen_and_serve().await
    }

    fn router(&self) -> Router {
        self.server.router()
    }
}
