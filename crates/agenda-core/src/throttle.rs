//! Minimum interval between refreshes of one widget.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

/// Default cooldown, in seconds, between two computations for the same widget.
pub const DEFAULT_COOLDOWN_SECS: i64 = 5;

/// Debounces refresh requests per widget.
///
/// Callers ask before computing; a burst of change signals for one widget
/// results in a single computation. Different widgets never block each other.
#[derive(Debug, Clone)]
pub struct RefreshThrottle {
    cooldown: TimeDelta,
    last_run: HashMap<u32, DateTime<Utc>>,
}

impl Default for RefreshThrottle {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(DEFAULT_COOLDOWN_SECS))
    }
}

impl RefreshThrottle {
    pub fn new(cooldown: TimeDelta) -> Self {
        Self {
            cooldown,
            last_run: HashMap::new(),
        }
    }

    /// Records a computation for `widget_id` at `now` if the cooldown since
    /// the previous one has passed. Returns whether the caller may proceed.
    pub fn try_begin(&mut self, widget_id: u32, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_run.get(&widget_id) {
            let elapsed = now - *last;
            if elapsed < self.cooldown && elapsed >= TimeDelta::zero() {
                tracing::debug!(
                    widget_id,
                    elapsed_ms = elapsed.num_milliseconds(),
                    "refresh throttled"
                );
                return false;
            }
        }
        self.last_run.insert(widget_id, now);
        true
    }

    /// Forgets a removed widget.
    pub fn forget(&mut self, widget_id: u32) {
        self.last_run.remove(&widget_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 8, 4, 10, 0, 0).unwrap() + TimeDelta::seconds(seconds)
    }

    #[test]
    fn test_burst_for_one_widget_runs_once() {
        let mut throttle = RefreshThrottle::default();

        assert!(throttle.try_begin(1, at(0)));
        assert!(!throttle.try_begin(1, at(1)));
        assert!(!throttle.try_begin(1, at(4)));
        assert!(throttle.try_begin(1, at(5)));
    }

    #[test]
    fn test_widgets_are_throttled_independently() {
        let mut throttle = RefreshThrottle::new(TimeDelta::seconds(10));

        assert!(throttle.try_begin(1, at(0)));
        assert!(throttle.try_begin(2, at(1)));
        assert!(!throttle.try_begin(1, at(2)));

        throttle.forget(1);
        assert!(throttle.try_begin(1, at(3)));
    }

    #[test]
    fn test_clock_moving_backwards_does_not_block() {
        let mut throttle = RefreshThrottle::default();

        assert!(throttle.try_begin(1, at(60)));
        assert!(throttle.try_begin(1, at(0)));
    }
}
