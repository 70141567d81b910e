// Execution of a single work request.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::cache::Storage;
use crate::persistence::DiskWriter;
use crate::upstream::Downloader;

use super::counters::Counters;
use super::request::{Priority, WorkRequest};

/// Job wires one request through download, cache update and disk write.
pub struct Job {
    downloader: Downloader,
    storage: Arc<dyn Storage>,
    writer: DiskWriter,
    counters: Arc<Counters>,
}

impl Job {
    pub fn new(
        downloader: Downloader,
        storage: Arc<dyn Storage>,
        writer: DiskWriter,
        counters: Arc<Counters>,
    ) -> Self {
        Self {
            downloader,
            storage,
            writer,
            counters,
        }
    }

    /// Runs request to completion. Failures are logged and dropped; a failed
    /// disk write leaves the freshly cached page in place.
    pub async fn run(&self, request: WorkRequest) {
        let start = Instant::now();
        let url = request.key();
        let priority = request.priority();

        match priority {
            Priority::High => self.counters.taken_high.fetch_add(1, Ordering::Relaxed),
            Priority::Low => self.counters.taken_low.fetch_add(1, Ordering::Relaxed),
        };

        let payload = match self.downloader.fetch(url, request.retry_limit()).await {
            Ok(payload) => payload,
            Err(e) => {
                self.counters.fetch_failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    component = "worker",
                    event = "fetch_failed",
                    url = %url,
                    lane = priority.as_str(),
                    error = %e,
                    "page download failed"
                );
                return;
            }
        };

        self.storage.store(url, payload.clone());
        self.counters.fetched.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = self.writer.save(&payload, url).await {
            self.counters.persist_failed.fetch_add(1, Ordering::Relaxed);
            error!(
                component = "worker",
                event = "persist_failed",
                url = %url,
                error = %e,
                "page cached but not written to disk"
            );
            return;
        }

        info!(
            component = "worker",
            event = "served",
            url = %url,
            paying = priority.is_paying(),
            size = payload.len(),
            elapsed = ?start.elapsed(),
            "customer served"
        );
    }
}
