//! Burst-coalescing debouncer
//!
//! Deadline-as-data: each trigger pushes the deadline out, and the owner
//! polls `fire` with the current time. Used for resize handling, where a
//! window drag produces dozens of size events that must collapse into one
//! projection update.

use std::time::Duration;

/// Quiet period after the last resize event before the update applies.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the debouncer; cancels any pending deadline.
    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True exactly once per armed burst, after the quiet period elapses.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_burst_collapses_to_one_fire() {
        let mut debouncer = Debouncer::new(RESIZE_DEBOUNCE);
        // Ten triggers within 50 ms.
        for i in 0..10 {
            debouncer.trigger(ms(i * 5));
            assert!(!debouncer.fire(ms(i * 5)));
        }
        // Not yet quiet for 100 ms after the last trigger at t=45.
        assert!(!debouncer.fire(ms(100)));
        assert!(!debouncer.fire(ms(144)));
        // Fires exactly once at ~145 ms, then stays quiet.
        assert!(debouncer.fire(ms(145)));
        assert!(!debouncer.fire(ms(200)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_rearm_after_fire() {
        let mut debouncer = Debouncer::new(RESIZE_DEBOUNCE);
        debouncer.trigger(ms(0));
        assert!(debouncer.fire(ms(100)));

        debouncer.trigger(ms(500));
        assert!(!debouncer.fire(ms(550)));
        assert!(debouncer.fire(ms(600)));
    }

    #[test]
    fn test_cancel_discards_pending_deadline() {
        let mut debouncer = Debouncer::new(RESIZE_DEBOUNCE);
        debouncer.trigger(ms(0));
        debouncer.cancel();
        assert!(!debouncer.fire(ms(1000)));
    }
}
