// Admission of download requests: serve from cache or enqueue.

use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::Storage;
use crate::metrics;

use super::lanes::Lanes;
use super::request::{Priority, WorkRequest};

/// Outcome of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Fresh cached payload, returned synchronously.
    Hit(Bytes),
    /// Enqueued on the given lane; the result is not reported back.
    Queued(Priority),
    /// Lanes are closed because the service is stopping.
    ShuttingDown,
}

/// Dispatcher decides per request whether to answer from cache or schedule a
/// download. It never blocks on worker availability.
pub struct Dispatcher {
    storage: Arc<dyn Storage>,
    lanes: Arc<Lanes>,
}

impl Dispatcher {
    pub fn new(storage: Arc<dyn Storage>, lanes: Arc<Lanes>) -> Self {
        Self { storage, lanes }
    }

    /// Submits url for download. The URL string is the cache key as is.
    /// `retry_limit` is clamped to `[0, 10]`.
    pub fn submit(&self, url: &str, retry_limit: i64, paying: bool) -> Admission {
        metrics::inc_requests();

        let lookup = self.storage.lookup(url);
        if lookup.fresh {
            if let Some(payload) = lookup.payload {
                self.storage.touch(url);
                metrics::inc_hits();
                debug!(component = "dispatcher", event = "hit", url = %url, "served from cache");
                return Admission::Hit(payload);
            }
        }
        metrics::inc_misses();

        let priority = Priority::from_paying(paying);
        let request = WorkRequest::new(url, retry_limit, priority);
        if !self.lanes.push(request) {
            warn!(
                component = "dispatcher",
                event = "lanes_closed",
                url = %url,
                "dropping request, service is stopping"
            );
            return Admission::ShuttingDown;
        }

        metrics::inc_queued(priority);
        debug!(
            component = "dispatcher",
            event = "queued",
            url = %url,
            lane = priority.as_str(),
            found_stale = lookup.found,
            "request queued"
        );
        Admission::Queued(priority)
    }

    pub fn lanes(&self) -> &Arc<Lanes> {
        &self.lanes
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}
