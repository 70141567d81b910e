// Fixed-size worker pool draining the priority lanes.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cache::Storage;
use crate::config::{Config, ConfigTrait};
use crate::persistence::DiskWriter;
use crate::upstream::Downloader;

use super::counters::Counters;
use super::job::Job;
use super::lanes::Lanes;
use super::telemetry;

/// WorkerPool runs `replicas` long-lived workers. Each worker handles one
/// request at a time, so the pool size bounds concurrent downloads.
pub struct WorkerPool {
    ctx: CancellationToken,
    replicas: usize,
    telemetry_interval: Duration,
    lanes: Arc<Lanes>,
    storage: Arc<dyn Storage>,
    job: Arc<Job>,
    counters: Arc<Counters>,
    w_num_active: Arc<AtomicI64>,
    w_wg: Mutex<JoinSet<()>>,
    inited: AtomicBool,
}

impl WorkerPool {
    pub fn new(
        shutdown_token: CancellationToken,
        cfg: &Config,
        lanes: Arc<Lanes>,
        storage: Arc<dyn Storage>,
        downloader: Downloader,
        writer: DiskWriter,
    ) -> Arc<Self> {
        let counters = Arc::new(Counters::new());
        let job = Arc::new(Job::new(downloader, storage.clone(), writer, counters.clone()));

        Arc::new(Self {
            ctx: shutdown_token.child_token(),
            replicas: cfg.workers(),
            telemetry_interval: cfg.telemetry_interval(),
            lanes,
            storage,
            job,
            counters,
            w_num_active: Arc::new(AtomicI64::new(0)),
            w_wg: Mutex::new(JoinSet::new()),
            inited: AtomicBool::new(false),
        })
    }

    /// Spawns the workers and the stats logger. Calling it again is a no-op.
    pub fn start(&self) {
        if self
            .inited
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        tokio::task::spawn(telemetry::logger(
            self.ctx.clone(),
            self.counters.clone(),
            self.lanes.clone(),
            self.storage.clone(),
            self.w_num_active.clone(),
            self.telemetry_interval,
        ));

        let mut wg = self.w_wg.lock();
        for id in 0..self.replicas {
            self.up_one(&mut wg, id);
        }

        info!(
            component = "workers",
            event = "started",
            replicas = self.replicas,
            "worker pool started"
        );
    }

    fn up_one(&self, wg: &mut JoinSet<()>, id: usize) {
        let ctx = self.ctx.clone();
        let lanes = self.lanes.clone();
        let job = self.job.clone();
        let w_num_active = self.w_num_active.clone();

        w_num_active.fetch_add(1, Ordering::Relaxed);
        wg.spawn(async move {
            let _guard = WorkerGuard::new(w_num_active, id);

            loop {
                let request = tokio::select! {
                    biased;
                    _ = ctx.cancelled() => return,
                    request = lanes.pop() => match request {
                        Some(request) => request,
                        None => return,
                    },
                };
                job.run(request).await;
            }
        });
    }

    /// Number of workers currently running.
    pub fn replicas(&self) -> i64 {
        self.w_num_active.load(Ordering::Relaxed)
    }

    pub fn is_alive(&self) -> bool {
        self.replicas() > 0
    }

    pub fn lanes(&self) -> &Arc<Lanes> {
        &self.lanes
    }

    #[cfg(test)]
    pub(crate) fn counters(&self) -> &Arc<Counters> {
        &self.counters
    }

    /// Closes the lanes, stops idle workers and waits for in-flight jobs.
    pub async fn close(&self) {
        self.lanes.close();
        self.ctx.cancel();

        let mut wg = std::mem::take(&mut *self.w_wg.lock());
        while wg.join_next().await.is_some() {}

        // Jobs that finished after the stats logger stopped.
        telemetry::flush(&self.counters, &self.lanes, self.storage.as_ref(), &self.w_num_active);

        info!(component = "workers", event = "stopped", "worker pool stopped");
    }
}

/// Guard to decrement active worker count on drop.
struct WorkerGuard {
    w_num_active: Arc<AtomicI64>,
    id: usize,
}

impl WorkerGuard {
    fn new(w_num_active: Arc<AtomicI64>, id: usize) -> Self {
        Self { w_num_active, id }
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.w_num_active.fetch_sub(1, Ordering::Relaxed);
        tracing::debug!(component = "workers", worker = self.id, "worker stopped");
    }
}
