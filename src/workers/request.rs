// Work items admitted into the priority lanes.

/// Upper bound for the per-request retry limit.
pub const MAX_RETRY_LIMIT: u8 = 10;

/// Lane a request is scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Paying customers.
    High,
    /// Everyone else.
    Low,
}

impl Priority {
    pub fn from_paying(paying: bool) -> Self {
        if paying {
            Priority::High
        } else {
            Priority::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Low => "low",
        }
    }

    pub fn is_paying(self) -> bool {
        self == Priority::High
    }
}

/// Clamps a raw retry limit into `[0, MAX_RETRY_LIMIT]`.
pub fn clamp_retry_limit(raw: i64) -> u8 {
    raw.clamp(0, i64::from(MAX_RETRY_LIMIT)) as u8
}

/// A page download waiting for a worker. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRequest {
    key: String,
    retry_limit: u8,
    priority: Priority,
}

impl WorkRequest {
    pub fn new(key: impl Into<String>, retry_limit: i64, priority: Priority) -> Self {
        Self {
            key: key.into(),
            retry_limit: clamp_retry_limit(retry_limit),
            priority,
        }
    }

    /// Canonical URL, also the cache key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn retry_limit(&self) -> u8 {
        self.retry_limit
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}
