//! Core types for the zone engine
//!
//! This module defines the data that flows through the engine: raw heart-rate
//! samples, the configured target zone, the derived zone state, alert events,
//! and the per-tick snapshot handed to the presentation layer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default staleness window in seconds. A reading older than this is no
/// longer trusted as "current" and the state reverts to [`ZoneState::Unknown`].
pub const DEFAULT_STALENESS_WINDOW_SECS: i64 = 10;

/// Default alert debounce interval in seconds.
pub const DEFAULT_DEBOUNCE_SECS: i64 = 4;

/// A single heart-rate reading as delivered by a sensor collaborator.
///
/// `timestamp` is when the sample was recorded by the sensor, not when it
/// arrived here. Immutable once created; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateSample {
    /// Beats per minute. Expected range is roughly 30-230; values outside
    /// that are passed through and left to the caller's judgement.
    pub bpm: u16,
    /// Recording time (UTC)
    pub timestamp: DateTime<Utc>,
}

impl HeartRateSample {
    pub fn new(bpm: u16, timestamp: DateTime<Utc>) -> Self {
        Self { bpm, timestamp }
    }
}

/// Inclusive target heart-rate range.
///
/// `low > high` is an invalid configuration and is rejected by the classifier;
/// `low == high` degenerates to a single-bpm zone and is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Lower bound (bpm, inclusive)
    pub low: u16,
    /// Upper bound (bpm, inclusive)
    pub high: u16,
}

impl ZoneConfig {
    pub fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// Derive the Zone 2 range from age: `max_hr = 220 - age`, zone is
    /// 60-70% of max.
    pub fn from_age(age: u16) -> Self {
        let max_hr = 220u16.saturating_sub(age) as f64;
        Self {
            low: (max_hr * 0.60).round() as u16,
            high: (max_hr * 0.70).round() as u16,
        }
    }

    /// True when the range is well-formed (`low <= high`).
    pub fn is_valid(&self) -> bool {
        self.low <= self.high
    }
}

/// Discrete zone classification. Exactly one holds at any instant.
///
/// `Unknown` is the initial state and the fallback whenever the signal goes
/// stale or no valid sample has arrived yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneState {
    Unknown,
    Below,
    InZone,
    Above,
}

impl ZoneState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneState::Unknown => "unknown",
            ZoneState::Below => "below",
            ZoneState::InZone => "in_zone",
            ZoneState::Above => "above",
        }
    }

    /// Whether time spent in this state counts toward the zone counter.
    /// At-or-above the target zone counts; below and unknown do not.
    pub fn counts_toward_zone(&self) -> bool {
        matches!(self, ZoneState::InZone | ZoneState::Above)
    }
}

/// Alert raised when the user leaves the target zone.
///
/// Entering the zone is the silent goal state; only leaving it is
/// alert-worthy. The presentation layer keys sound/haptic choice off the
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertEvent {
    /// Heart rate dropped out of the zone (`InZone` -> `Below`)
    LeftZoneBelow,
    /// Heart rate climbed out of the zone (`InZone` -> `Above`)
    LeftZoneAbove,
}

impl AlertEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertEvent::LeftZoneBelow => "left_zone_below",
            AlertEvent::LeftZoneAbove => "left_zone_above",
        }
    }
}

/// Per-tick output for the presentation layer.
///
/// Carries everything a view needs to render one update: current state, the
/// latest fresh bpm (none when stale), both counters, and any alert that
/// fired since the previous snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    /// Session this snapshot belongs to
    pub session_id: Uuid,
    /// Snapshot time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Current zone classification
    pub state: ZoneState,
    /// Latest fresh heart rate, if any
    pub bpm: Option<u16>,
    /// Zone range the classification was made against
    pub config: ZoneConfig,
    /// Whole seconds spent at or above the target zone since session start
    pub zone_seconds: u64,
    /// Whole seconds with any valid signal since session start
    pub total_seconds: u64,
    /// Alert pending delivery to the user, if one fired
    pub alert: Option<AlertEvent>,
}

/// Staleness window as a `chrono::Duration`.
pub fn default_staleness_window() -> Duration {
    Duration::seconds(DEFAULT_STALENESS_WINDOW_SECS)
}

/// Debounce interval as a `chrono::Duration`.
pub fn default_debounce_interval() -> Duration {
    Duration::seconds(DEFAULT_DEBOUNCE_SECS)
}
