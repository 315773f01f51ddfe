//! Time-in-zone accumulation
//!
//! Driven by a nominal 1 Hz tick that reports the real elapsed time since the
//! previous tick, so missed or delayed ticks are tolerated. Counters are whole
//! seconds; sub-second remainders are carried in milliseconds per counter so
//! fractional ticks accumulate without drift.

use chrono::Duration;

use crate::types::ZoneState;

/// Accumulates elapsed seconds at/above the target zone and total session time
#[derive(Debug, Clone, Default)]
pub struct TimeInZoneAccumulator {
    zone_seconds: u64,
    total_seconds: u64,
    zone_remainder_ms: i64,
    total_remainder_ms: i64,
}

impl TimeInZoneAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one tick of `elapsed` wall-clock time in `state`.
    ///
    /// `Unknown` advances neither counter; `Below` advances only the total;
    /// `InZone` and `Above` advance both. Non-positive elapsed durations are
    /// ignored.
    pub fn tick(&mut self, state: ZoneState, elapsed: Duration) {
        let elapsed_ms = elapsed.num_milliseconds();
        if elapsed_ms <= 0 {
            return;
        }

        if state != ZoneState::Unknown {
            self.total_remainder_ms += elapsed_ms;
            self.total_seconds += (self.total_remainder_ms / 1000) as u64;
            self.total_remainder_ms %= 1000;
        }

        if state.counts_toward_zone() {
            self.zone_remainder_ms += elapsed_ms;
            self.zone_seconds += (self.zone_remainder_ms / 1000) as u64;
            self.zone_remainder_ms %= 1000;
        }
    }

    /// Whole seconds spent at or above the target zone
    pub fn zone_seconds(&self) -> u64 {
        self.zone_seconds
    }

    /// Whole seconds with any valid signal
    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    /// Zero both counters and their remainders
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
