//! Transition tracking and alert debouncing
//!
//! Consumes the classifier's state stream and decides when the user should be
//! alerted. Only leaving the target zone alerts; entering it is the silent
//! goal state. A debounce window suppresses alert chatter when the heart rate
//! oscillates around a zone boundary.

use chrono::{DateTime, Duration, Utc};

use crate::types::{default_debounce_interval, AlertEvent, ZoneState};

/// Detects zone transitions and emits debounced leave-zone alerts
#[derive(Debug, Clone)]
pub struct TransitionTracker {
    debounce_interval: Duration,
    last_emitted_state: ZoneState,
    debounce_until: Option<DateTime<Utc>>,
}

impl Default for TransitionTracker {
    fn default() -> Self {
        Self::new(default_debounce_interval())
    }
}

impl TransitionTracker {
    /// Create a tracker with the given debounce interval
    pub fn new(debounce_interval: Duration) -> Self {
        Self {
            debounce_interval,
            last_emitted_state: ZoneState::Unknown,
            debounce_until: None,
        }
    }

    /// Observe a newly classified state.
    ///
    /// Emits an alert only for `InZone -> Below` and `InZone -> Above`
    /// transitions, and only outside the debounce window. Every other
    /// transition is recorded silently so later observations compare against
    /// the true latest state.
    pub fn observe(&mut self, new_state: ZoneState, now: DateTime<Utc>) -> Option<AlertEvent> {
        if new_state == self.last_emitted_state {
            return None;
        }

        if self.debounce_until.is_some_and(|until| now < until) {
            self.last_emitted_state = new_state;
            return None;
        }

        let event = match (self.last_emitted_state, new_state) {
            (ZoneState::InZone, ZoneState::Below) => Some(AlertEvent::LeftZoneBelow),
            (ZoneState::InZone, ZoneState::Above) => Some(AlertEvent::LeftZoneAbove),
            _ => None,
        };

        self.last_emitted_state = new_state;
        if event.is_some() {
            self.debounce_until = Some(now + self.debounce_interval);
        }
        event
    }

    /// State the tracker last recorded
    pub fn last_state(&self) -> ZoneState {
        self.last_emitted_state
    }

    /// Return to the initial state with no debounce armed (new session)
    pub fn reset(&mut self) {
        self.last_emitted_state = ZoneState::Unknown;
        self.debounce_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_leaving_zone_alerts() {
        let mut tracker = TransitionTracker::default();
        tracker.observe(ZoneState::InZone, ts(0));

        assert_eq!(
            tracker.observe(ZoneState::Above, ts(10)),
            Some(AlertEvent::LeftZoneAbove)
        );

        tracker.observe(ZoneState::InZone, ts(20));
        assert_eq!(
            tracker.observe(ZoneState::Below, ts(30)),
            Some(AlertEvent::LeftZoneBelow)
        );
    }

    #[test]
    fn test_no_alert_on_entry() {
        let mut tracker = TransitionTracker::default();
        assert_eq!(tracker.observe(ZoneState::Below, ts(0)), None);
        assert_eq!(tracker.observe(ZoneState::InZone, ts(1)), None);

        tracker.observe(ZoneState::Above, ts(10));
        assert_eq!(tracker.observe(ZoneState::InZone, ts(20)), None);
    }

    #[test]
    fn test_idempotent_observations() {
        let mut tracker = TransitionTracker::default();
        tracker.observe(ZoneState::InZone, ts(0));

        assert!(tracker.observe(ZoneState::Above, ts(10)).is_some());
        assert_eq!(tracker.observe(ZoneState::Above, ts(11)), None);
        assert_eq!(tracker.observe(ZoneState::Above, ts(60)), None);
    }

    #[test]
    fn test_debounce_suppresses_chatter() {
        let mut tracker = TransitionTracker::default();
        tracker.observe(ZoneState::InZone, ts(0));

        // First exit alerts and arms the 4s window
        assert!(tracker.observe(ZoneState::Above, ts(10)).is_some());
        // Bounce back in and out within the window: recorded, not alerted
        assert_eq!(tracker.observe(ZoneState::InZone, ts(11)), None);
        assert_eq!(tracker.observe(ZoneState::Above, ts(12)), None);

        // After the window expires the same pattern alerts again
        assert_eq!(tracker.observe(ZoneState::InZone, ts(15)), None);
        assert_eq!(
            tracker.observe(ZoneState::Above, ts(16)),
            Some(AlertEvent::LeftZoneAbove)
        );
    }

    #[test]
    fn test_debounced_transition_still_updates_state() {
        let mut tracker = TransitionTracker::default();
        tracker.observe(ZoneState::InZone, ts(0));
        tracker.observe(ZoneState::Above, ts(10));

        // Within the window the state change is recorded silently
        tracker.observe(ZoneState::InZone, ts(11));
        assert_eq!(tracker.last_state(), ZoneState::InZone);
    }

    #[test]
    fn test_direct_swings_do_not_alert() {
        let mut tracker = TransitionTracker::default();
        tracker.observe(ZoneState::Below, ts(0));
        assert_eq!(tracker.observe(ZoneState::Above, ts(1)), None);
        assert_eq!(tracker.observe(ZoneState::Below, ts(2)), None);
    }

    #[test]
    fn test_unknown_transitions_never_alert() {
        let mut tracker = TransitionTracker::default();
        tracker.observe(ZoneState::InZone, ts(0));

        // Signal loss from inside the zone is not an alert
        assert_eq!(tracker.observe(ZoneState::Unknown, ts(10)), None);
        assert_eq!(tracker.observe(ZoneState::Below, ts(20)), None);
    }

    #[test]
    fn test_custom_debounce_interval() {
        let mut tracker = TransitionTracker::new(Duration::seconds(30));
        tracker.observe(ZoneState::InZone, ts(0));
        tracker.observe(ZoneState::Above, ts(10));

        tracker.observe(ZoneState::InZone, ts(20));
        // 30s window still open at t=35
        assert_eq!(tracker.observe(ZoneState::Above, ts(35)), None);
    }

    #[test]
    fn test_reset() {
        let mut tracker = TransitionTracker::default();
        tracker.observe(ZoneState::InZone, ts(0));
        tracker.observe(ZoneState::Above, ts(10));

        tracker.reset();
        assert_eq!(tracker.last_state(), ZoneState::Unknown);
        // Debounce is cleared: an immediate new exit alerts
        tracker.observe(ZoneState::InZone, ts(11));
        assert_eq!(
            tracker.observe(ZoneState::Below, ts(12)),
            Some(AlertEvent::LeftZoneBelow)
        );
    }
}
