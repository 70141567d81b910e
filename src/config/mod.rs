// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PROD: &str = "prod";
pub const TEST: &str = "test";

pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_CACHE_SHARDS: usize = 16;
pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_TELEMETRY_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(rename = "pagefetch")]
    pub pagefetch: ConfigBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub runtime: Option<Runtime>,
    pub api: Option<Api>,
    pub cache: Option<Cache>,
    pub workers: Option<Workers>,
    pub upstream: Option<Upstream>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Runtime {
    pub num_cpus: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Api {
    pub name: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cache {
    #[serde(default, with = "humantime_serde")]
    pub ttl: Option<Duration>,
    pub shards: Option<usize>,
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Workers {
    pub replicas: Option<usize>,
    #[serde(rename = "telemetry_interval", default, with = "humantime_serde")]
    pub telemetry_interval: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Upstream {
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    /// Pause between fetch attempts; absent or zero means immediate retry.
    #[serde(rename = "retry_backoff", default, with = "humantime_serde")]
    pub retry_backoff: Option<Duration>,
}

pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    fn runtime(&self) -> &Runtime;
    fn api(&self) -> Option<&Api>;
    fn cache_ttl(&self) -> Duration;
    fn cache_shards(&self) -> usize;
    fn cache_dir(&self) -> PathBuf;
    fn workers(&self) -> usize;
    fn telemetry_interval(&self) -> Duration;
    fn upstream_timeout(&self) -> Duration;
    fn retry_backoff(&self) -> Duration;
}

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.pagefetch.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.pagefetch.env == PROD
    }

    fn runtime(&self) -> &Runtime {
        const AUTO: Runtime = Runtime { num_cpus: 0 };
        self.pagefetch.runtime.as_ref().unwrap_or(&AUTO)
    }

    fn api(&self) -> Option<&Api> {
        self.pagefetch.api.as_ref()
    }

    fn cache_ttl(&self) -> Duration {
        self.pagefetch
            .cache
            .as_ref()
            .and_then(|c| c.ttl)
            .unwrap_or(DEFAULT_CACHE_TTL)
    }

    fn cache_shards(&self) -> usize {
        self.pagefetch
            .cache
            .as_ref()
            .and_then(|c| c.shards)
            .unwrap_or(DEFAULT_CACHE_SHARDS)
    }

    fn cache_dir(&self) -> PathBuf {
        self.pagefetch
            .cache
            .as_ref()
            .and_then(|c| c.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
    }

    fn workers(&self) -> usize {
        self.pagefetch
            .workers
            .as_ref()
            .and_then(|w| w.replicas)
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_WORKERS)
    }

    fn telemetry_interval(&self) -> Duration {
        self.pagefetch
            .workers
            .as_ref()
            .and_then(|w| w.telemetry_interval)
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_TELEMETRY_INTERVAL)
    }

    fn upstream_timeout(&self) -> Duration {
        self.pagefetch
            .upstream
            .as_ref()
            .and_then(|u| u.timeout)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT)
    }

    fn retry_backoff(&self) -> Duration {
        self.pagefetch
            .upstream
            .as_ref()
            .and_then(|u| u.retry_backoff)
            .unwrap_or(Duration::ZERO)
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::parse(&data).with_context(|| format!("unmarshal yaml from {:?}", abs_path))
    }

    /// Parses configuration from YAML text.
    pub fn parse(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data)?;
        if cfg.pagefetch.env.is_empty() {
            anyhow::bail!("pagefetch.env must be set");
        }
        Ok(cfg)
    }
}

mod test_config;
pub use test_config::new_test_config;
