//! HTTP server implementation.

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use crate::config::{Config, ConfigTrait, DEFAULT_PORT};
use crate::controller::controller::Controller;
use crate::middleware::middleware::Middleware;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP server built from a set of controllers and middlewares.
pub struct HttpServer {
    shutdown_token: CancellationToken,
    config: Config,
    router: Router,
}

impl HttpServer {
    pub fn new(
        shutdown_token: CancellationToken,
        config: Config,
        controllers: Vec<Box<dyn Controller>>,
        middlewares: Vec<Box<dyn Middleware>>,
    ) -> Arc<Self> {
        let router = Self::build_router(controllers);
        let router = Self::merge_middlewares(router, middlewares);

        Arc::new(Self {
            shutdown_token,
            config,
            router,
        })
    }

    /// Fully layered router, usable without binding a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    fn addr(&self) -> Result<(String, SocketAddr)> {
        let port = self
            .config
            .api()
            .and_then(|api| api.port.as_deref())
            .unwrap_or(DEFAULT_PORT)
            .trim_start_matches(':');

        let addr: SocketAddr = format!("0.0.0.0:{}", port)
            .parse()
            .with_context(|| format!("failed to parse server port {:?}", port))?;

        Ok((port.to_string(), addr))
    }

    /// Serves until the shutdown token is cancelled.
    pub async fn listen_and_serve(&self) -> Result<()> {
        let name = self
            .config
            .api()
            .and_then(|api| api.name.as_deref())
            .unwrap_or("pagefetch")
            .to_string();
        let (port, addr) = self.addr()?;

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind TCP listener on {}", addr))?;

        info!(
            component = "server",
            event = "started",
            name = %name,
            port = %port,
            "server started"
        );

        let shutdown_token = self.shutdown_token.clone();
        let serve_future =
            axum::serve(listener, self.router.clone()).with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
            });

        if let Err(e) = serve_future.await {
            error!(
                component = "server",
                event = "listen_and_serve_failed",
                name = %name,
                port = %port,
                error = %e,
                "server failed to listen and serve"
            );
            return Err(e.into());
        }

        info!(
            component = "server",
            event = "stopped",
            name = %name,
            port = %port,
            "server stopped"
        );

        Ok(())
    }

    fn build_router(controllers: Vec<Box<dyn Controller>>) -> Router {
        controllers
            .iter()
            .fold(Router::new(), |router, controller| controller.add_route(router))
    }

    /// The first middleware in the list ends up outermost.
    fn merge_middlewares(router: Router, middlewares: Vec<Box<dyn Middleware>>) -> Router {
        let router = router.layer(TimeoutLayer::new(REQUEST_TIMEOUT));
        middlewares
            .iter()
            .rev()
            .fold(router, |router, middleware| middleware.apply(router))
    }
}
