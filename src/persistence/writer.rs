// Disk writer for fetched pages.

use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::info;

use super::sanitize::file_name_for_url;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("create cache dir {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write page file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes page payloads into a flat directory, one file per URL.
#[derive(Debug, Clone)]
pub struct DiskWriter {
    dir: PathBuf,
}

impl DiskWriter {
    /// Opens the writer, creating `dir` if it does not exist yet.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        info!(
            component = "persistence",
            event = "cache_dir_ready",
            dir = %dir.display(),
            "cache directory ready"
        );
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the payload for url is written to.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(file_name_for_url(url))
    }

    /// Writes the whole payload, replacing any previous file for url.
    pub async fn save(&self, payload: &Bytes, url: &str) -> Result<PathBuf, PersistError> {
        let path = self.path_for(url);
        tokio::fs::write(&path, payload)
            .await
            .map_err(|source| PersistError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
