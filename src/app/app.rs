// Main pagefetch application implementation.

use anyhow::{Context, Result};
use axum::Router;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cache::{PageCache, Storage};
use crate::config::{Config, ConfigTrait};
use crate::persistence::DiskWriter;
use crate::shutdown::GracefulShutdown;
use crate::upstream::{Downloader, HttpTransport, Transport};
use crate::workers::{Dispatcher, Lanes, WorkerPool};

use super::server::{Http, HttpServer};

/// Encapsulates the entire application state.
#[derive(Clone)]
pub struct App {
    shutdown_token: CancellationToken,
    cache: Arc<PageCache>,
    dispatcher: Arc<Dispatcher>,
    pool: Arc<WorkerPool>,
    server: Arc<dyn Http>,
    serve_error: Arc<Mutex<Option<anyhow::Error>>>,
}

impl App {
    /// Builds the application with the real HTTP transport.
    pub async fn new(shutdown_token: CancellationToken, cfg: Config) -> Result<Self> {
        let transport = HttpTransport::new(&cfg);
        Self::with_transport(shutdown_token, cfg, transport).await
    }

    /// Builds the application around an arbitrary upstream transport and
    /// starts the worker pool.
    pub async fn with_transport(
        shutdown_token: CancellationToken,
        cfg: Config,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let cache = PageCache::from_config(&cfg);
        let lanes = Arc::new(Lanes::new());

        let writer = DiskWriter::open(cfg.cache_dir())
            .await
            .context("failed to prepare cache directory")?;
        let downloader = Downloader::new(transport, cfg.retry_backoff());

        let pool = WorkerPool::new(
            shutdown_token.clone(),
            &cfg,
            lanes.clone(),
            cache.clone(),
            downloader,
            writer,
        );
        pool.start();

        let dispatcher = Arc::new(Dispatcher::new(cache.clone(), lanes));
        let server = Arc::new(HttpServer::new(
            shutdown_token.clone(),
            cfg,
            dispatcher.clone(),
            pool.clone(),
        ));

        Ok(Self {
            shutdown_token,
            cache,
            dispatcher,
            pool,
            server,
            serve_error: Arc::new(Mutex::new(None)),
        })
    }

    /// Serves HTTP in the background; closes the app once the server returns
    /// and then marks itself done on gsh.
    pub async fn serve(&self, gsh: Arc<GracefulShutdown>) -> Result<()> {
        let app = self.clone();

        tokio::task::spawn(async move {
            if let Err(e) = app.server.listen_and_serve().await {
                error!(
                    component = "app",
                    scope = "server",
                    event = "serve_failed",
                    error = %e,
                    "server failed to serve"
                );
                *app.serve_error.lock() = Some(e);
            }

            app.close().await;
            gsh.done();
        });

        info!(component = "app", event = "started", "application lifecycle");

        Ok(())
    }

    /// Error the HTTP server stopped with, if any.
    pub fn take_serve_error(&self) -> Option<anyhow::Error> {
        self.serve_error.lock().take()
    }

    /// Router with every controller and middleware, for in-process requests.
    pub fn router(&self) -> Router {
        self.server.router()
    }

    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    pub fn is_alive(&self) -> bool {
        if !self.pool.is_alive() {
            warn!(
                component = "app",
                scope = "workers",
                event = "gone_away",
                "worker pool has no live workers"
            );
            return false;
        }
        true
    }

    /// Stops accepting work and waits for in-flight downloads to finish.
    pub async fn close(&self) {
        self.shutdown_token.cancel();
        self.pool.close().await;

        info!(
            component = "app",
            event = "stopped",
            cache_len = self.cache.len(),
            "application lifecycle"
        );
    }
}
