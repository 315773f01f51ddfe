//! Zone classification
//!
//! Maps a validated heart rate (or the absence of one) and the current target
//! range to a discrete [`ZoneState`]. Pure and stateless: the config is passed
//! on every call rather than cached, so settings changes take effect on the
//! very next classification.

use crate::error::ZoneError;
use crate::types::{ZoneConfig, ZoneState};

/// Classifier for mapping heart rate to a zone state
pub struct ZoneClassifier;

impl ZoneClassifier {
    /// Classify a heart rate against the target range.
    ///
    /// `None` input (no fresh sample) maps to `Unknown`. Boundaries are
    /// inclusive of the zone: `low` and `high` themselves classify as
    /// `InZone`. A config with `low > high` is refused.
    pub fn classify(bpm: Option<u16>, config: &ZoneConfig) -> Result<ZoneState, ZoneError> {
        if !config.is_valid() {
            return Err(ZoneError::InvalidConfig {
                low: config.low,
                high: config.high,
            });
        }

        Ok(match bpm {
            None => ZoneState::Unknown,
            Some(bpm) if bpm < config.low => ZoneState::Below,
            Some(bpm) if bpm > config.high => ZoneState::Above,
            Some(_) => ZoneState::InZone,
        })
    }
}
