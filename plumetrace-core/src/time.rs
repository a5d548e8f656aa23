//! Time abstraction for the engine
//!
//! The engine never reads a clock directly; the refresh cycle and the
//! pollution pulse both take their notion of "now" from a single injected
//! `TimeSource`. This keeps the whole engine deterministic under test and
//! portable to targets without a system clock.

/// Timestamp in milliseconds since epoch (or since boot for monotonic sources)
pub type Timestamp = u64;

/// Source of time for the engine
pub trait TimeSource {
    /// Get the current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source backed by the operating system
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Manually driven time source for tests
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: Timestamp,
}

impl FixedClock {
    /// Create a clock pinned to the given timestamp
    pub const fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Pin the clock to a new timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the clock by `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}
