//! Highlight blink sequence
//!
//! A highlight request drives a bounded material blink: alternate the
//! component's material between a highlighted variant and the original a
//! fixed number of times, ending on the original. The sequence is plain
//! data advanced by polling with the current time, so it is testable with
//! a virtual clock and nothing can fire after the owner is dropped.

use std::time::Duration;

/// Total material swaps per highlight; even steps apply the highlight
/// material, odd steps restore the original, so the sequence always ends
/// on the original.
pub const BLINK_STEPS: u32 = 8;

/// Delay between material swaps.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    Highlight,
    Original,
}

#[derive(Debug, Clone)]
pub struct BlinkSequence {
    id: String,
    step: u32,
    next_at: Duration,
}

impl BlinkSequence {
    /// Start a sequence for one component id. The first phase is due
    /// immediately on the next poll.
    pub fn new(id: impl Into<String>, now: Duration) -> Self {
        Self {
            id: id.into(),
            step: 0,
            next_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_finished(&self) -> bool {
        self.step >= BLINK_STEPS
    }

    /// Advance the sequence. Returns the phase to apply when a step is
    /// due, `None` between steps or once finished.
    pub fn poll(&mut self, now: Duration) -> Option<BlinkPhase> {
        if self.is_finished() || now < self.next_at {
            return None;
        }
        let phase = if self.step % 2 == 0 {
            BlinkPhase::Highlight
        } else {
            BlinkPhase::Original
        };
        self.step += 1;
        self.next_at = now + BLINK_INTERVAL;
        Some(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_blink_sequence_eight_steps_ending_on_original() {
        let mut seq = BlinkSequence::new("wall_001", ms(0));
        let mut phases = Vec::new();
        let mut now = ms(0);
        while !seq.is_finished() {
            if let Some(phase) = seq.poll(now) {
                phases.push(phase);
            }
            now += ms(50);
        }
        assert_eq!(
            phases,
            vec![
                BlinkPhase::Highlight,
                BlinkPhase::Original,
                BlinkPhase::Highlight,
                BlinkPhase::Original,
                BlinkPhase::Highlight,
                BlinkPhase::Original,
                BlinkPhase::Highlight,
                BlinkPhase::Original,
            ]
        );
        assert_eq!(phases.last(), Some(&BlinkPhase::Original));
    }

    #[test]
    fn test_blink_respects_interval() {
        let mut seq = BlinkSequence::new("beam_001", ms(1000));
        assert_eq!(seq.poll(ms(999)), None);
        assert_eq!(seq.poll(ms(1000)), Some(BlinkPhase::Highlight));
        // Not due again until a full interval has elapsed.
        assert_eq!(seq.poll(ms(1100)), None);
        assert_eq!(seq.poll(ms(1250)), Some(BlinkPhase::Original));
    }

    #[test]
    fn test_finished_sequence_stays_silent() {
        let mut seq = BlinkSequence::new("slab_001", ms(0));
        let mut now = ms(0);
        for _ in 0..BLINK_STEPS {
            assert!(seq.poll(now).is_some());
            now += BLINK_INTERVAL;
        }
        assert!(seq.is_finished());
        assert_eq!(seq.poll(now + ms(10_000)), None);
    }
}
