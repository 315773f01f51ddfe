//! Sample ingestion
//!
//! This module filters the raw sample stream before classification:
//! - out-of-order and duplicate timestamps are rejected
//! - late-arriving samples older than the staleness window are rejected
//! - the latest accepted reading is held for downstream polling
//!
//! Rejections are logged at debug level and never surfaced to the user.

use chrono::{DateTime, Duration, Utc};

use crate::types::{default_staleness_window, HeartRateSample};

/// Why a sample was dropped instead of forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Timestamp not newer than the last accepted sample
    OutOfOrder,
    /// Timestamp older than `now - staleness_window`
    Stale,
}

/// Stateful filter holding the single last-accepted reading
#[derive(Debug, Clone)]
pub struct SampleIngest {
    staleness_window: Duration,
    last_accepted: Option<HeartRateSample>,
}

impl Default for SampleIngest {
    fn default() -> Self {
        Self::new(default_staleness_window())
    }
}

impl SampleIngest {
    /// Create an ingest filter with the given staleness window
    pub fn new(staleness_window: Duration) -> Self {
        Self {
            staleness_window,
            last_accepted: None,
        }
    }

    /// Validate a sample against the last accepted one and the wall clock.
    ///
    /// On acceptance the sample becomes the new last-accepted reading and is
    /// returned for forwarding downstream.
    pub fn ingest(
        &mut self,
        sample: HeartRateSample,
        now: DateTime<Utc>,
    ) -> Result<HeartRateSample, RejectReason> {
        if let Some(last) = &self.last_accepted {
            if sample.timestamp <= last.timestamp {
                tracing::debug!(
                    bpm = sample.bpm,
                    timestamp = %sample.timestamp,
                    last_timestamp = %last.timestamp,
                    "dropping out-of-order sample"
                );
                return Err(RejectReason::OutOfOrder);
            }
        }

        if sample.timestamp < now - self.staleness_window {
            tracing::debug!(
                bpm = sample.bpm,
                timestamp = %sample.timestamp,
                "dropping stale sample"
            );
            return Err(RejectReason::Stale);
        }

        self.last_accepted = Some(sample);
        Ok(sample)
    }

    /// True when no accepted sample exists or the latest one has aged past
    /// the staleness window. Callers poll this each tick to force the state
    /// back to `Unknown` even without new input.
    pub fn check_staleness(&self, now: DateTime<Utc>) -> bool {
        match &self.last_accepted {
            Some(sample) => sample.timestamp < now - self.staleness_window,
            None => true,
        }
    }

    /// Latest bpm while fresh, `None` once the signal has gone stale.
    pub fn current(&self, now: DateTime<Utc>) -> Option<u16> {
        if self.check_staleness(now) {
            None
        } else {
            self.last_accepted.map(|s| s.bpm)
        }
    }

    /// Last accepted sample regardless of freshness
    pub fn last_accepted(&self) -> Option<&HeartRateSample> {
        self.last_accepted.as_ref()
    }

    /// Forget the last accepted sample (new session)
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
