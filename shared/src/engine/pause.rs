//! Pause/resume accounting

use serde::{Deserialize, Serialize};

use crate::types::EpochMillis;

/// Accumulated pause time of a roast session.
///
/// Transitions return the next state; repeating a pause or a resume is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseTracker {
    paused_ms: i64,
    pause_started_at: Option<EpochMillis>,
}

impl PauseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker seeded with a previously accumulated pause duration
    pub fn with_paused_ms(paused_ms: i64) -> Self {
        Self {
            paused_ms: paused_ms.max(0),
            pause_started_at: None,
        }
    }

    pub fn pause(self, now_ms: EpochMillis) -> Self {
        if self.is_paused() {
            return self;
        }
        Self {
            pause_started_at: Some(now_ms),
            ..self
        }
    }

    pub fn resume(self, now_ms: EpochMillis) -> Self {
        match self.pause_started_at {
            Some(started) => Self {
                paused_ms: self.paused_ms + (now_ms - started).max(0),
                pause_started_at: None,
            },
            None => self,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started_at.is_some()
    }

    /// Pause duration finalized by completed resumes
    pub fn paused_ms(&self) -> i64 {
        self.paused_ms
    }

    pub fn pause_started_at(&self) -> Option<EpochMillis> {
        self.pause_started_at
    }

    /// The "now" elapsed-time math must use.
    ///
    /// While paused this is pinned to the pause instant, so elapsed time stays
    /// frozen even though the open pause is not yet part of `paused_ms`.
    pub fn effective_now(&self, now_ms: EpochMillis) -> EpochMillis {
        match self.pause_started_at {
            Some(started) => now_ms.min(started),
            None => now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_resume_accumulates() {
        let tracker = PauseTracker::new().pause(10_000).resume(25_000);
        assert!(!tracker.is_paused());
        assert_eq!(tracker.paused_ms(), 15_000);

        let tracker = tracker.pause(40_000).resume(41_500);
        assert_eq!(tracker.paused_ms(), 16_500);
    }

    #[test]
    fn test_repeated_pause_keeps_first_instant() {
        let tracker = PauseTracker::new().pause(10_000).pause(12_000);
        assert_eq!(tracker.pause_started_at(), Some(10_000));
        assert_eq!(tracker.resume(20_000).paused_ms(), 10_000);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let tracker = PauseTracker::with_paused_ms(5_000);
        assert_eq!(tracker.resume(99_000), tracker);
        assert_eq!(tracker.resume(99_000).resume(100_000).paused_ms(), 5_000);
    }

    #[test]
    fn test_effective_now_frozen_while_paused() {
        let tracker = PauseTracker::new().pause(10_000);
        assert_eq!(tracker.effective_now(12_000), 10_000);
        assert_eq!(tracker.effective_now(60_000), 10_000);
        assert_eq!(tracker.effective_now(9_000), 9_000);
        assert_eq!(tracker.resume(60_000).effective_now(61_000), 61_000);
    }

    #[test]
    fn test_resume_before_pause_instant_adds_nothing() {
        let tracker = PauseTracker::new().pause(10_000).resume(8_000);
        assert_eq!(tracker.paused_ms(), 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Time spent paused never shows up as elapsed time
            #[test]
            fn prop_elapsed_excludes_pauses(
                gaps in prop::collection::vec((0i64..=60_000, 0i64..=60_000), 1..20)
            ) {
                let mut tracker = PauseTracker::new();
                let mut now = 0;
                let mut running = 0;
                for (run, paused) in gaps {
                    now += run;
                    running += run;
                    tracker = tracker.pause(now);
                    now += paused;
                    prop_assert_eq!(tracker.effective_now(now) - tracker.paused_ms(), running);
                    tracker = tracker.resume(now);
                    prop_assert_eq!(now - tracker.paused_ms(), running);
                }
            }
        }
    }
}
