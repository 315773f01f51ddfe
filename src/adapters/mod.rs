//! Sensor-boundary adapters
//!
//! This module defines the narrow synchronous interface between the engine
//! and the platform-specific sensor collaborators (BLE central, health-data
//! store). The collaborators own all discovery, connection, and authorization
//! machinery; they push results into the core through [`SampleSink`].

pub mod ble;
pub mod health;

pub use health::SourceStatus;

use chrono::{DateTime, Utc};

/// Interface the platform glue calls into with decoded sensor output.
///
/// Replaces the delegate-callback style of the platform frameworks: whatever
/// thread or queue the callback lands on, the glue marshals onto a single
/// thread and makes plain synchronous calls here.
pub trait SampleSink {
    /// A decoded heart-rate reading, unit-converted to bpm
    fn on_sample(&mut self, bpm: u16, timestamp: DateTime<Utc>);

    /// Sensor availability or authorization changed
    fn on_status_change(&mut self, status: SourceStatus);
}
