//! Cancelable debounce timer driven by an injected clock.

use std::time::{Duration, Instant};

/// Holds at most one pending value until input has been stable for the
/// configured delay. Scheduling a new value replaces the pending one and
/// restarts the timer.
///
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Debounce {
            delay,
            pending: None,
        }
    }

    /// Schedule the value, canceling anything still pending.
    ///
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Return the pending value once its delay has elapsed. The value is
    /// yielded exactly once.
    ///
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, scheduled)) if now.saturating_duration_since(*scheduled) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn fires_once_after_delay() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY);
        debounce.schedule("a", start);
        assert_eq!(debounce.poll(start + Duration::from_millis(499)), None);
        assert_eq!(debounce.poll(start + DELAY), Some("a"));
        assert_eq!(debounce.poll(start + DELAY * 2), None);
        assert!(!debounce.is_pending());
    }

    #[test]
    fn reschedule_restarts_timer() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY);
        debounce.schedule("a", start);
        debounce.schedule("ab", start + Duration::from_millis(300));
        assert_eq!(debounce.poll(start + DELAY), None);
        assert_eq!(debounce.poll(start + Duration::from_millis(800)), Some("ab"));
    }

    #[test]
    fn cancel_drops_pending_value() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DELAY);
        debounce.schedule("a", start);
        debounce.cancel();
        assert_eq!(debounce.poll(start + DELAY), None);
    }
}
