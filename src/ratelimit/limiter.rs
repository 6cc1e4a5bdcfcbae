//! Core fixed-window limiter.

use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::counter::WindowCounter;
use super::unit::IntervalUnit;
use crate::config::LimiterSettings;
use crate::error::{Result, TurnstileError};

/// A fixed-window admission counter.
///
/// At most `capacity` calls to [`try_admit`](Limiter::try_admit) succeed per
/// window. A window opens on the first call after the previous one expired
/// and lasts `window_duration` from that call. There is no background timer:
/// expiry is noticed lazily by the next caller.
///
/// Because each window restarts in full, a burst at the end of one window
/// followed by a burst at the start of the next can admit up to twice the
/// capacity in less than one window duration.
///
/// The limiter is thread-safe; share it with an `Arc`.
#[derive(Debug)]
pub struct Limiter<C: Clock = SystemClock> {
    /// Maximum admissions per window
    capacity: u64,
    /// Window length in milliseconds
    window_millis: u64,
    /// Source of "now"
    clock: C,
    /// Remaining quota and deadline, updated together
    state: Mutex<WindowCounter>,
}

impl Limiter<SystemClock> {
    /// Create a limiter driven by the system clock.
    ///
    /// Fails with [`TurnstileError::InvalidConfiguration`] if `capacity` or
    /// `interval_value` is negative, or `interval_unit` is finer than a
    /// millisecond.
    pub fn new(capacity: i64, interval_value: i64, interval_unit: IntervalUnit) -> Result<Self> {
        Self::with_clock(capacity, interval_value, interval_unit, SystemClock::new())
    }

    /// Create a limiter from configuration settings.
    pub fn from_settings(settings: &LimiterSettings) -> Result<Self> {
        Self::new(settings.capacity, settings.interval, settings.unit)
    }
}

impl<C: Clock> Limiter<C> {
    /// Create a limiter that reads time from `clock`.
    pub fn with_clock(
        capacity: i64,
        interval_value: i64,
        interval_unit: IntervalUnit,
        clock: C,
    ) -> Result<Self> {
        let capacity = u64::try_from(capacity).map_err(|_| {
            TurnstileError::InvalidConfiguration(format!(
                "capacity must be >= 0, got {}",
                capacity
            ))
        })?;
        let interval_value = u64::try_from(interval_value).map_err(|_| {
            TurnstileError::InvalidConfiguration(format!(
                "interval must be >= 0, got {}",
                interval_value
            ))
        })?;
        let window_millis = interval_unit.to_millis(interval_value).ok_or_else(|| {
            TurnstileError::InvalidConfiguration(format!(
                "{} are not supported, use milliseconds or a coarser unit",
                interval_unit
            ))
        })?;

        debug!(
            capacity = capacity,
            window_ms = window_millis,
            "Created fixed-window limiter"
        );

        Ok(Self {
            capacity,
            window_millis,
            clock,
            state: Mutex::new(WindowCounter::new()),
        })
    }

    /// Try to admit one request.
    ///
    /// Returns `true` and consumes one unit of quota if any is left in the
    /// current window, otherwise returns `false` without changing state.
    pub fn try_admit(&self) -> bool {
        let mut state = self.state.lock();
        let now = self.clock.now_millis();
        state.admit(now, self.capacity, self.window_millis)
    }

    /// Maximum admissions per window.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Length of each window.
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_millis)
    }

    /// The clock this limiter reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::ManualClock;

    fn manual_limiter(capacity: i64, interval: i64, unit: IntervalUnit) -> Limiter<ManualClock> {
        Limiter::with_clock(capacity, interval, unit, ManualClock::new(1_000_000)).unwrap()
    }

    #[test]
    fn test_limiter_creation() {
        let limiter = Limiter::new(50, 200, IntervalUnit::Milliseconds).unwrap();
        assert_eq!(limiter.capacity(), 50);
        assert_eq!(limiter.window_duration(), Duration::from_millis(200));
    }

    #[test]
    fn test_window_duration_converts_units() {
        let limiter = Limiter::new(1, 3, IntervalUnit::Minutes).unwrap();
        assert_eq!(limiter.window_duration(), Duration::from_secs(180));
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let err = Limiter::new(-1, 200, IntervalUnit::Milliseconds).unwrap_err();
        assert!(matches!(err, TurnstileError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_negative_interval_rejected() {
        let err = Limiter::new(10, -1, IntervalUnit::Seconds).unwrap_err();
        assert!(matches!(err, TurnstileError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_sub_millisecond_units_rejected() {
        for unit in [IntervalUnit::Nanoseconds, IntervalUnit::Microseconds] {
            let err = Limiter::new(10, 5, unit).unwrap_err();
            assert!(matches!(err, TurnstileError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_admits_up_to_capacity() {
        let limiter = manual_limiter(5, 1, IntervalUnit::Seconds);

        for _ in 0..5 {
            assert!(limiter.try_admit());
        }

        // The 6th request should be rejected
        assert!(!limiter.try_admit());
    }

    #[test]
    fn test_replenishes_after_window() {
        let limiter = manual_limiter(2, 1, IntervalUnit::Seconds);
        assert!(limiter.try_admit());
        assert!(limiter.try_admit());
        assert!(!limiter.try_admit());

        limiter.clock().advance(Duration::from_millis(1_001));

        assert!(limiter.try_admit());
        assert!(limiter.try_admit());
        assert!(!limiter.try_admit());
    }

    #[test]
    fn test_zero_capacity_never_admits() {
        let limiter = manual_limiter(0, 1, IntervalUnit::Seconds);

        for step in 0..10 {
            limiter.clock().advance(Duration::from_millis(700 * step));
            assert!(!limiter.try_admit());
        }
    }

    #[test]
    fn test_zero_interval_resets_every_millisecond() {
        let limiter = manual_limiter(1, 0, IntervalUnit::Milliseconds);
        assert!(limiter.try_admit());
        assert!(!limiter.try_admit());

        limiter.clock().advance(Duration::from_millis(1));
        assert!(limiter.try_admit());
    }

    #[test]
    fn test_limiter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Limiter>();
        assert_send_sync::<Limiter<ManualClock>>();
    }
}
