//! Idle detection.
//!
//! Every persisted edit marks activity. Once activity is pending and the user
//! has been quiet for strictly longer than the idle threshold, a history
//! capture is due. Taking the capture clears the pending flag, so a single
//! idle period produces at most one capture.

use quire_model::Timestamp;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityTracker {
    last_activity: Timestamp,
    pending: bool,
    idle_threshold: Duration,
}
impl ActivityTracker {
    pub fn new(idle_threshold: Duration, now: Timestamp) -> Self {
        Self { last_activity: now, pending: false, idle_threshold }
    }

    /// Record an edit.
    pub fn mark(&mut self, now: Timestamp) {
        self.last_activity = now;
        self.pending = true;
    }

    /// Forget pending activity and restart the idle timer.
    pub fn reset(&mut self, now: Timestamp) {
        self.last_activity = now;
        self.pending = false;
    }

    pub fn last_activity(&self) -> Timestamp {
        self.last_activity
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn idle_threshold(&self) -> Duration {
        self.idle_threshold
    }

    pub fn idle_for(&self, now: Timestamp) -> Duration {
        now.since(self.last_activity)
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.pending && self.idle_for(now) > self.idle_threshold
    }

    /// Like [`is_due`](Self::is_due), but clears the pending flag when it
    /// returns `true`.
    pub fn take_due(&mut self, now: Timestamp) -> bool {
        let due = self.is_due(now);
        if due {
            self.pending = false;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MINUTE: Duration = Duration::from_secs(60);

    fn at(millis: i64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[rstest]
    #[case::not_pending(false, 120_000, false)]
    #[case::exactly_threshold(true, 60_000, false)]
    #[case::just_past_threshold(true, 60_001, true)]
    #[case::long_idle(true, 3_600_000, true)]
    #[case::recent_edit(true, 5_000, false)]
    fn test_is_due(#[case] edited: bool, #[case] idle_millis: i64, #[case] expected: bool) {
        let mut tracker = ActivityTracker::new(MINUTE, at(1_000));
        if edited {
            tracker.mark(at(1_000));
        }
        assert_eq!(tracker.is_due(at(1_000 + idle_millis)), expected);
    }

    #[test]
    fn test_take_due_fires_once_per_idle_period() {
        let mut tracker = ActivityTracker::new(MINUTE, at(0));
        tracker.mark(at(0));
        assert!(tracker.take_due(at(61_000)));
        assert!(!tracker.is_pending());
        assert!(!tracker.take_due(at(120_000)));

        tracker.mark(at(130_000));
        assert!(!tracker.take_due(at(150_000)));
        assert!(tracker.take_due(at(200_000)));
    }

    #[test]
    fn test_reset_clears_pending() {
        let mut tracker = ActivityTracker::new(MINUTE, at(0));
        tracker.mark(at(0));
        tracker.reset(at(10_000));
        assert!(!tracker.is_pending());
        assert_eq!(tracker.last_activity(), at(10_000));
        assert!(!tracker.is_due(at(500_000)));
    }

    #[test]
    fn test_clock_going_backwards_is_not_idle() {
        let mut tracker = ActivityTracker::new(MINUTE, at(100_000));
        tracker.mark(at(100_000));
        assert_eq!(tracker.idle_for(at(0)), Duration::ZERO);
        assert!(!tracker.is_due(at(0)));
    }
}
