// Scripted upstream transports.

use bytes::Bytes;
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::upstream::{Response, Transport, TransportError};

/// Fails the first `failures` calls with a connection error, then answers
/// with `status` and `body`.
pub struct FlakyTransport {
    failures: usize,
    status: u16,
    body: Bytes,
    calls: AtomicUsize,
}

impl FlakyTransport {
    pub fn new(failures: usize, body: Bytes) -> Arc<Self> {
        Arc::new(Self {
            failures,
            status: 200,
            body,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn always_failing() -> Arc<Self> {
        Self::new(usize::MAX, Bytes::new())
    }

    pub fn with_status(status: u16, body: Bytes) -> Arc<Self> {
        Arc::new(Self {
            failures: 0,
            status,
            body,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transport for FlakyTransport {
    async fn get(&self, url: &str) -> Result<Response, TransportError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("scripted failure #{} for {}", n + 1, url),
            )));
        }
        Ok(Response::new(self.status, self.body.clone()))
    }
}

/// Records the order URLs are requested in. Requests for the gated URL park
/// until [`GatedTransport::open`] is called, which lets a test hold the only
/// worker busy while it fills the lanes.
pub struct GatedTransport {
    gated_url: String,
    gate: Semaphore,
    entered: Semaphore,
    seen: Mutex<Vec<String>>,
}

impl GatedTransport {
    pub fn new(gated_url: &str) -> Arc<Self> {
        Arc::new(Self {
            gated_url: gated_url.to_string(),
            gate: Semaphore::new(0),
            entered: Semaphore::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Resolves once a request for the gated URL is parked.
    pub async fn wait_entered(&self) {
        if let Ok(permit) = self.entered.acquire().await {
            permit.forget();
        }
    }

    pub fn open(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait::async_trait]
impl Transport for GatedTransport {
    async fn get(&self, url: &str) -> Result<Response, TransportError> {
        self.seen.lock().push(url.to_string());
        if url == self.gated_url {
            self.entered.add_permits(1);
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }
        Ok(Response::new(200, Bytes::from(format!("body of {url}"))))
    }
}
