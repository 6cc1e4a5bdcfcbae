//! Fixed-window counter state.

/// Quota bookkeeping for a single fixed window.
///
/// This type is not synchronized on its own; [`Limiter`](super::Limiter)
/// keeps it behind a mutex so the reset and the decrement happen as one step.
#[derive(Debug, Default)]
pub(crate) struct WindowCounter {
    /// Admissions left in the current window
    remaining: u64,
    /// Epoch millis at which the current window expires; `None` until the first check
    window_ends_at: Option<u64>,
}

impl WindowCounter {
    /// Create a counter whose window has already expired.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Try to take one admission at time `now`.
    ///
    /// Starts a fresh window first if the current one has passed. Rejections
    /// leave the counter untouched.
    pub(crate) fn admit(&mut self, now: u64, capacity: u64, window_millis: u64) -> bool {
        self.maybe_reset_window(now, capacity, window_millis);

        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Hard reset relative to `now`; leftover quota is discarded.
    fn maybe_reset_window(&mut self, now: u64, capacity: u64, window_millis: u64) {
        let expired = match self.window_ends_at {
            Some(ends_at) => now > ends_at,
            None => true,
        };

        if expired {
            self.window_ends_at = Some(now.saturating_add(window_millis));
            self.remaining = capacity;
        }
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> u64 {
        self.remaining
    }

    #[cfg(test)]
    pub(crate) fn window_ends_at(&self) -> Option<u64> {
        self.window_ends_at
    }
}
