//! Session orchestration
//!
//! [`ZoneSession`] wires the stages together for one workout: samples flow
//! through ingest validation into classification, transition tracking, and
//! time-in-zone accumulation, and each tick produces a [`ZoneSnapshot`] for
//! the presentation layer.
//!
//! The session holds no locks; the host must call it from a single thread
//! (or provide its own mutual exclusion). Within a tick the ordering is
//! always classify-then-accumulate.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::accumulator::TimeInZoneAccumulator;
use crate::adapters::{SampleSink, SourceStatus};
use crate::classifier::ZoneClassifier;
use crate::error::ZoneError;
use crate::ingest::SampleIngest;
use crate::settings::UserSettings;
use crate::tracker::TransitionTracker;
use crate::types::{AlertEvent, HeartRateSample, ZoneSnapshot, ZoneState};

/// Stateful engine for one monitoring session
#[derive(Debug, Clone)]
pub struct ZoneSession {
    session_id: Uuid,
    settings: UserSettings,
    ingest: SampleIngest,
    tracker: TransitionTracker,
    accumulator: TimeInZoneAccumulator,
    last_tick: Option<DateTime<Utc>>,
    status: SourceStatus,
    /// Alert raised between ticks, carried by the next snapshot
    pending_alert: Option<AlertEvent>,
}

impl Default for ZoneSession {
    fn default() -> Self {
        Self::new(UserSettings::default())
    }
}

impl ZoneSession {
    /// Create a session with default staleness and debounce windows
    pub fn new(settings: UserSettings) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            settings,
            ingest: SampleIngest::default(),
            tracker: TransitionTracker::default(),
            accumulator: TimeInZoneAccumulator::new(),
            last_tick: None,
            status: SourceStatus::Idle,
            pending_alert: None,
        }
    }

    /// Create a session with explicit staleness and debounce windows
    pub fn with_windows(
        settings: UserSettings,
        staleness_window: Duration,
        debounce_interval: Duration,
    ) -> Self {
        Self {
            ingest: SampleIngest::new(staleness_window),
            tracker: TransitionTracker::new(debounce_interval),
            ..Self::new(settings)
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Replace the settings; the new zone range applies from the next call
    pub fn set_settings(&mut self, settings: UserSettings) {
        self.settings = settings;
    }

    /// Latest status reported by the sensor collaborator
    pub fn status(&self) -> &SourceStatus {
        &self.status
    }

    /// Feed one decoded sample into the session.
    ///
    /// Rejected samples (out-of-order, stale) leave all state untouched and
    /// return `Ok(None)`. An accepted sample is classified immediately so a
    /// zone exit alerts without waiting for the next tick; the alert is also
    /// parked for the next snapshot.
    pub fn on_sample(
        &mut self,
        bpm: u16,
        timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<AlertEvent>, ZoneError> {
        let config = self.settings.effective_config();
        let sample = HeartRateSample::new(bpm, timestamp);

        let Ok(sample) = self.ingest.ingest(sample, now) else {
            return Ok(None);
        };

        let state = ZoneClassifier::classify(Some(sample.bpm), &config)?;
        let alert = self.tracker.observe(state, now);
        if alert.is_some() {
            self.pending_alert = alert;
        }
        Ok(alert)
    }

    /// Advance the session clock and produce a presentation snapshot.
    ///
    /// Nominally called at 1 Hz; the real elapsed time since the previous
    /// tick is credited, so delayed ticks do not lose seconds. A signal that
    /// has gone stale classifies as `Unknown` here even if no new sample
    /// arrived.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<ZoneSnapshot, ZoneError> {
        let config = self.settings.effective_config();

        let bpm = self.ingest.current(now);
        let state = ZoneClassifier::classify(bpm, &config)?;
        let alert = self.tracker.observe(state, now);

        let elapsed = match self.last_tick {
            Some(prev) => now - prev,
            None => Duration::zero(),
        };
        self.last_tick = Some(now);
        self.accumulator.tick(state, elapsed);

        let pending = self.pending_alert.take();
        Ok(ZoneSnapshot {
            session_id: self.session_id,
            timestamp: now,
            state,
            bpm,
            config,
            zone_seconds: self.accumulator.zone_seconds(),
            total_seconds: self.accumulator.total_seconds(),
            alert: alert.or(pending),
        })
    }

    /// Current state without advancing anything
    pub fn state(&self) -> ZoneState {
        self.tracker.last_state()
    }

    /// Start a new workout: counters, tracker, ingest, and the tick clock
    /// are cleared and a fresh session id is issued. Settings survive.
    pub fn reset(&mut self) {
        self.session_id = Uuid::new_v4();
        self.ingest.reset();
        self.tracker.reset();
        self.accumulator.reset();
        self.last_tick = None;
        self.pending_alert = None;
    }
}

impl SampleSink for ZoneSession {
    fn on_sample(&mut self, bpm: u16, timestamp: DateTime<Utc>) {
        if let Err(e) = ZoneSession::on_sample(self, bpm, timestamp, Utc::now()) {
            tracing::warn!(error = %e, "sample dropped");
        }
    }

    fn on_status_change(&mut self, status: SourceStatus) {
        tracing::debug!(?status, "source status changed");
        self.status = status;
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

    fn custom_session(low: u16, high: u16) -> ZoneSession {
        ZoneSession::new(UserSettings::with_custom_range(low, high))
    }

    #[test]
    fn test_single_alert_across_zone_sweep() {
        // bpm sequence 90, 105, 150, 120 against (100, 140):
        // Unknown->Below, Below->InZone, InZone->Above (alert), Above->InZone
        let mut session = custom_session(100, 140);
        let sequence = [(90u16, 0i64), (105, 1), (150, 2), (120, 3)];

        let mut alerts = Vec::new();
        for (bpm, t) in sequence {
            if let Some(alert) = session.on_sample(bpm, ts(t), ts(t)).unwrap() {
                alerts.push(alert);
            }
        }

        assert_eq!(alerts, vec![AlertEvent::LeftZoneAbove]);
    }

    #[test]
    fn test_out_of_order_sample_leaves_state_untouched() {
        let mut session = custom_session(100, 140);
        session.on_sample(120, ts(5), ts(5)).unwrap();
        assert_eq!(session.state(), ZoneState::InZone);

        // t=3 after t=5: rejected, classifier state unaffected
        let alert = session.on_sample(200, ts(3), ts(5)).unwrap();
        assert_eq!(alert, None);
        assert_eq!(session.state(), ZoneState::InZone);

        let snapshot = session.tick(ts(5)).unwrap();
        assert_eq!(snapshot.bpm, Some(120));
        assert_eq!(snapshot.state, ZoneState::InZone);
    }

    #[test]
    fn test_stale_signal_reverts_to_unknown() {
        let mut session = custom_session(100, 140);
        session.on_sample(120, ts(0), ts(0)).unwrap();

        let snapshot = session.tick(ts(5)).unwrap();
        assert_eq!(snapshot.state, ZoneState::InZone);

        // 11s after the last sample the reading is no longer trusted
        let snapshot = session.tick(ts(11)).unwrap();
        assert_eq!(snapshot.state, ZoneState::Unknown);
        assert_eq!(snapshot.bpm, None);
        assert_eq!(snapshot.alert, None);
    }

    #[test]
    fn test_time_in_zone_split() {
        // 4 ticks in zone, then 6 below
        let mut session = custom_session(100, 140);
        let mut t = 0i64;

        session.on_sample(120, ts(0), ts(0)).unwrap();
        // Anchor the tick clock; elapsed time is credited from here on
        session.tick(ts(0)).unwrap();
        for _ in 0..4 {
            t += 1;
            session.on_sample(120, ts(t), ts(t)).unwrap();
            session.tick(ts(t)).unwrap();
        }
        for _ in 0..6 {
            t += 1;
            session.on_sample(90, ts(t), ts(t)).unwrap();
            session.tick(ts(t)).unwrap();
        }

        let snapshot = session.tick(ts(t)).unwrap();
        assert_eq!(snapshot.zone_seconds, 4);
        assert_eq!(snapshot.total_seconds, 10);
    }

    #[test]
    fn test_first_tick_accumulates_nothing() {
        let mut session = custom_session(100, 140);
        session.on_sample(120, ts(0), ts(0)).unwrap();

        let snapshot = session.tick(ts(0)).unwrap();
        assert_eq!(snapshot.total_seconds, 0);
        assert_eq!(snapshot.zone_seconds, 0);
    }

    #[test]
    fn test_alert_between_ticks_lands_in_next_snapshot() {
        let mut session = custom_session(100, 140);
        session.on_sample(120, ts(0), ts(0)).unwrap();
        session.tick(ts(0)).unwrap();

        let alert = session.on_sample(150, ts(1), ts(1)).unwrap();
        assert_eq!(alert, Some(AlertEvent::LeftZoneAbove));

        let snapshot = session.tick(ts(1)).unwrap();
        assert_eq!(snapshot.alert, Some(AlertEvent::LeftZoneAbove));

        // Delivered once, not replayed
        let snapshot = session.tick(ts(2)).unwrap();
        assert_eq!(snapshot.alert, None);
    }

    #[test]
    fn test_age_derived_zone_in_snapshot() {
        let mut session = ZoneSession::new(UserSettings::from_age(40));
        session.on_sample(117, ts(0), ts(0)).unwrap();

        let snapshot = session.tick(ts(0)).unwrap();
        assert_eq!(snapshot.config.low, 108);
        assert_eq!(snapshot.config.high, 126);
        assert_eq!(snapshot.state, ZoneState::InZone);
    }

    #[test]
    fn test_settings_change_applies_next_call() {
        let mut session = custom_session(100, 140);
        session.on_sample(150, ts(0), ts(0)).unwrap();
        assert_eq!(session.state(), ZoneState::Above);

        session.set_settings(UserSettings::with_custom_range(100, 160));
        let snapshot = session.tick(ts(1)).unwrap();
        assert_eq!(snapshot.state, ZoneState::InZone);
    }

    #[test]
    fn test_invalid_custom_range_surfaces() {
        let mut session = custom_session(140, 100);
        let err = session.tick(ts(0)).unwrap_err();
        assert!(matches!(err, ZoneError::InvalidConfig { .. }));
    }

    #[test]
    fn test_reset_starts_fresh_session() {
        let mut session = custom_session(100, 140);
        session.on_sample(120, ts(0), ts(0)).unwrap();
        session.tick(ts(0)).unwrap();
        session.tick(ts(5)).unwrap();
        let old_id = session.session_id();

        session.reset();
        assert_ne!(session.session_id(), old_id);
        assert_eq!(session.state(), ZoneState::Unknown);

        let snapshot = session.tick(ts(6)).unwrap();
        assert_eq!(snapshot.total_seconds, 0);
        assert_eq!(snapshot.zone_seconds, 0);
        assert_eq!(snapshot.state, ZoneState::Unknown);
    }

    #[test]
    fn test_sink_status_channel() {
        let mut session = custom_session(100, 140);
        session.on_status_change(SourceStatus::Searching);
        assert_eq!(*session.status(), SourceStatus::Searching);

        session.on_status_change(SourceStatus::AuthorizationDenied);
        assert_eq!(*session.status(), SourceStatus::AuthorizationDenied);
    }
}
