use super::{Api, Cache, Config, ConfigBox, Logs, Runtime, Upstream, Workers};
use std::path::PathBuf;
use std::time::Duration;

/// Creates a new test configuration.
pub fn new_test_config() -> Config {
    Config {
        pagefetch: ConfigBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            runtime: Some(Runtime { num_cpus: 2 }),
            api: Some(Api {
                name: Some("pagefetch:8091".to_string()),
                port: Some("8091".to_string()),
            }),
            cache: Some(Cache {
                ttl: Some(super::DEFAULT_CACHE_TTL),
                shards: Some(8),
                dir: Some(PathBuf::from("public/cache")),
            }),
            workers: Some(Workers {
                replicas: Some(4),
                telemetry_interval: Some(Duration::from_secs(5)),
            }),
            upstream: Some(Upstream {
                timeout: Some(Duration::from_secs(5)),
                retry_backoff: None,
            }),
        },
    }
}
