// Main entrypoint for the pagefetch service.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use pagefetch::app::App;
use pagefetch::config::{Config, ConfigTrait};
use pagefetch::controller::metrics::init_prometheus_exporter;
use pagefetch::shutdown::GracefulShutdown;
use pagefetch::time;

const CONFIG_PATH: &str = "cfg/pagefetch.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/pagefetch.cfg.local.yaml";

const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(60);

/// pagefetch - caching page downloader with paying-customer priority
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,
}

/// Loads the config from the given path, or the local override, or the
/// default path, in that order.
fn load_cfg(path: Option<PathBuf>) -> Result<(Config, String)> {
    if let Some(custom_path) = path {
        let cfg = Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path))?;
        return Ok((cfg, custom_path.display().to_string()));
    }

    match Config::load(CONFIG_PATH_LOCAL) {
        Ok(cfg) => Ok((cfg, CONFIG_PATH_LOCAL.to_string())),
        Err(_) => {
            let cfg = Config::load(CONFIG_PATH)
                .with_context(|| format!("failed to load config from {}", CONFIG_PATH))?;
            Ok((cfg, CONFIG_PATH.to_string()))
        }
    }
}

/// Configures structured logging. RUST_LOG takes precedence over the
/// configured level.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_deref())
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

fn build_runtime(cfg: &Config) -> Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    let cores = cfg.runtime().num_cpus;
    if cores == 0 {
        info!(
            component = "main",
            event = "num_cpus_configured",
            num_cpus = num_cpus::get(),
            "using all available cores"
        );
    } else {
        builder.worker_threads(cores);
        warn!(
            component = "main",
            event = "num_cpus_configured",
            num_cpus = cores,
            available = num_cpus::get(),
            "runtime worker threads limited by config"
        );
    }

    builder.build().context("failed to create tokio runtime")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (cfg, cfg_path) = load_cfg(args.cfg)?;
    configure_logger(&cfg);
    info!(component = "config", event = "load_success", path = %cfg_path, "config loaded");

    // The recorder must be installed before the runtime exists.
    if let Err(e) = init_prometheus_exporter() {
        warn!(
            component = "main",
            event = "metrics_disabled",
            error = %e,
            "metrics endpoint will not be available"
        );
    }

    build_runtime(&cfg)?.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<()> {
    let shutdown_token = CancellationToken::new();

    let time_token = time::start(Duration::from_millis(1));

    let graceful_shutdown = Arc::new(GracefulShutdown::new(shutdown_token.clone()));
    graceful_shutdown.set_graceful_timeout(GRACEFUL_TIMEOUT).await;

    let app = App::new(shutdown_token.clone(), cfg)
        .await
        .context("failed to build application")?;

    graceful_shutdown.add(1);
    app.serve(graceful_shutdown.clone()).await?;

    let result = graceful_shutdown.await_shutdown().await;
    time_token.cancel();

    if let Err(e) = result {
        error!(
            component = "main",
            scope = "service",
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down service"
        );
        return Err(e);
    }

    match app.take_serve_error() {
        Some(e) => Err(e.context("http server stopped with an error")),
        None => Ok(()),
    }
}
