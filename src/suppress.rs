//! Time window during which genuine digitizer input is dropped.
//!
//! Every synthetic emission pushes the deadline to `now + window`; a genuine
//! read is suppressed while `now < deadline`. The deadline is stored as
//! nanoseconds since the arbiter's origin so it fits in one atomic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Default suppression window, measured on a reMarkable 2.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub struct SuppressionArbiter {
    origin: Instant,
    window: Duration,
    /// 0 means idle.
    deadline_ns: AtomicU64,
}

impl SuppressionArbiter {
    pub fn new(window: Duration) -> Self {
        Self {
            origin: Instant::now(),
            window,
            deadline_ns: AtomicU64::new(0),
        }
    }

    /// Extend the window from `now`. Never moves the deadline backwards.
    pub fn refresh_at(&self, now: Instant) {
        let deadline = self.offset_ns(now).saturating_add(self.window.as_nanos() as u64);
        self.deadline_ns.fetch_max(deadline, Ordering::AcqRel);
    }

    pub fn refresh(&self) {
        self.refresh_at(Instant::now());
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.offset_ns(now) < self.deadline_ns.load(Ordering::Acquire)
    }

    fn offset_ns(&self, t: Instant) -> u64 {
        t.saturating_duration_since(self.origin).as_nanos() as u64
    }
}

impl Default for SuppressionArbiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_idle_until_first_emission() {
        let arbiter = SuppressionArbiter::default();
        assert!(!arbiter.is_suppressed(Instant::now()));
    }

    #[test]
    fn test_window_expires() {
        let arbiter = SuppressionArbiter::default();
        let t0 = Instant::now();
        arbiter.refresh_at(t0);

        assert!(arbiter.is_suppressed(t0));
        assert!(arbiter.is_suppressed(t0 + 100 * MS));
        assert!(arbiter.is_suppressed(t0 + 149 * MS));
        assert!(!arbiter.is_suppressed(t0 + 150 * MS));
        assert!(!arbiter.is_suppressed(t0 + 200 * MS));
    }

    #[test]
    fn test_refresh_extends_window() {
        let arbiter = SuppressionArbiter::default();
        let t0 = Instant::now();
        arbiter.refresh_at(t0);
        arbiter.refresh_at(t0 + 100 * MS);

        assert!(arbiter.is_suppressed(t0 + 200 * MS));
        assert!(!arbiter.is_suppressed(t0 + 250 * MS));
    }

    #[test]
    fn test_stale_refresh_does_not_shorten() {
        let arbiter = SuppressionArbiter::default();
        let t0 = Instant::now();
        arbiter.refresh_at(t0 + 100 * MS);
        arbiter.refresh_at(t0);

        assert!(arbiter.is_suppressed(t0 + 200 * MS));
    }

    #[test]
    fn test_zero_window_never_suppresses() {
        let arbiter = SuppressionArbiter::new(Duration::ZERO);
        let t0 = Instant::now();
        arbiter.refresh_at(t0);
        assert!(!arbiter.is_suppressed(t0));
    }
}
