//! Health-data collaborator boundary
//!
//! The platform health store reports readings as `(bpm, timestamp)` pairs
//! already unit-converted to beats per minute, and availability or
//! authorization failures on a separate status channel. Neither is fatal:
//! the engine degrades to `Unknown` and waits, while the presentation layer
//! renders the status as "waiting/disconnected" text. Retry and reconnect
//! policy stays with the collaborator.

use serde::{Deserialize, Serialize};

/// Sensor-source status as reported by the platform collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    /// No source active
    Idle,
    /// Scanning / waiting for a device or query result
    Searching,
    /// Receiving samples
    Connected,
    /// User denied health-data or Bluetooth permission
    AuthorizationDenied,
    /// Source cannot deliver data (powered off, unsupported, disconnected)
    Unavailable(String),
}

impl SourceStatus {
    /// Whether samples can be expected in this status
    pub fn is_connected(&self) -> bool {
        matches!(self, SourceStatus::Connected)
    }
}

/// Convert a platform float reading (e.g. HealthKit's count/min double) to
/// whole bpm. Non-finite and negative values are invalid.
pub fn bpm_from_f64(value: f64) -> Option<u16> {
    if !value.is_finite() || value < 0.0 || value > u16::MAX as f64 {
        return None;
    }
    Some(value.round() as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bpm_conversion_rounds() {
        assert_eq!(bpm_from_f64(117.4), Some(117));
        assert_eq!(bpm_from_f64(117.5), Some(118));
        assert_eq!(bpm_from_f64(0.0), Some(0));
    }

    #[test]
    fn test_bpm_conversion_rejects_garbage() {
        assert_eq!(bpm_from_f64(f64::NAN), None);
        assert_eq!(bpm_from_f64(f64::INFINITY), None);
        assert_eq!(bpm_from_f64(-5.0), None);
        assert_eq!(bpm_from_f64(70_000.0), None);
    }

    #[test]
    fn test_status_connected() {
        assert!(SourceStatus::Connected.is_connected());
        assert!(!SourceStatus::AuthorizationDenied.is_connected());
        assert!(!SourceStatus::Unavailable("Bluetooth is off".into()).is_connected());
    }
}
