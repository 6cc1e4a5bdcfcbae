//! Time sources for window tracking.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// A source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync + Debug {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall clock backed by `chrono::Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // Pre-epoch clocks read as zero.
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time value, so a test can hand one clone to a
/// limiter and keep another to drive time forward.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    current: Arc<Mutex<u64>>,
}

impl ManualClock {
    /// Create a manual clock reading `start_millis`.
    pub fn new(start_millis: u64) -> Self {
        Self {
            current: Arc::new(Mutex::new(start_millis)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        let mut current = self.current.lock();
        *current = current.saturating_add(millis);
    }

    /// Set the clock to an absolute time.
    pub fn set(&self, millis: u64) {
        *self.current.lock() = millis;
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        *self.current.lock()
    }
}
