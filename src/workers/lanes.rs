// Two-lane work queue drained by the worker pool.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

use super::request::{Priority, WorkRequest};

struct LanesInner {
    high: VecDeque<WorkRequest>,
    low: VecDeque<WorkRequest>,
    closed: bool,
}

impl LanesInner {
    fn pop(&mut self) -> Option<WorkRequest> {
        self.high.pop_front().or_else(|| self.low.pop_front())
    }
}

/// Lanes holds the high and low priority queues behind one lock, so a pop
/// sees both lanes at the same instant and never takes Low while High has
/// an item. Both lanes are unbounded: push never blocks and never rejects
/// while open.
pub struct Lanes {
    inner: Mutex<LanesInner>,
    notify: Notify,
}

impl Lanes {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LanesInner {
                high: VecDeque::new(),
                low: VecDeque::new(),
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Appends the request to its lane and wakes one waiting worker.
    /// Returns false once the lanes are closed.
    pub fn push(&self, request: WorkRequest) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.closed {
                return false;
            }
            match request.priority() {
                Priority::High => inner.high.push_back(request),
                Priority::Low => inner.low.push_back(request),
            }
        }
        self.notify.notify_one();
        true
    }

    /// Takes the next request without waiting, High first.
    pub fn try_pop(&self) -> Option<WorkRequest> {
        self.inner.lock().pop()
    }

    /// Waits for the next request, High first.
    /// Returns None once the lanes are closed; queued items are dropped then.
    pub async fn pop(&self) -> Option<WorkRequest> {
        loop {
            // Register before checking so a push between the check and the
            // first poll still wakes this waiter.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let mut inner = self.inner.lock();
                if inner.closed {
                    return None;
                }
                if let Some(request) = inner.pop() {
                    return Some(request);
                }
            }
            notified.await;
        }
    }

    /// Stops admission and releases every waiting worker.
    pub fn close(&self) {
        self.inner.lock().closed = true;
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Current (high, low) queue depths.
    pub fn depth(&self) -> (usize, usize) {
        let inner = self.inner.lock();
        (inner.high.len(), inner.low.len())
    }
}

impl Default for Lanes {
    fn default() -> Self {
        Self::new()
    }
}
