//! User settings
//!
//! The settings storage collaborator owns these values; the engine only reads
//! them. When `use_custom_range` is false the zone range is always recomputed
//! from age rather than trusting stored values, which may be zero or stale.

use serde::{Deserialize, Serialize};

use crate::error::ZoneError;
use crate::types::ZoneConfig;

/// User-facing configuration as persisted by the host app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Age in years, used for the 220 - age estimate
    pub age: u16,
    /// Custom lower bound (bpm), meaningful only with `use_custom_range`
    pub low: u16,
    /// Custom upper bound (bpm), meaningful only with `use_custom_range`
    pub high: u16,
    /// Prefer the explicit (low, high) range over the age estimate
    pub use_custom_range: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            age: 40,
            low: 0,
            high: 0,
            use_custom_range: false,
        }
    }
}

impl UserSettings {
    /// Settings that derive the zone from age
    pub fn from_age(age: u16) -> Self {
        Self {
            age,
            ..Self::default()
        }
    }

    /// Settings with an explicit user-entered range
    pub fn with_custom_range(low: u16, high: u16) -> Self {
        Self {
            low,
            high,
            use_custom_range: true,
            ..Self::default()
        }
    }

    /// The zone range currently in effect.
    ///
    /// Recomputed from age on every call unless a custom range is selected.
    pub fn effective_config(&self) -> ZoneConfig {
        if self.use_custom_range {
            ZoneConfig::new(self.low, self.high)
        } else {
            ZoneConfig::from_age(self.age)
        }
    }

    /// Load settings from JSON as persisted by the host app
    pub fn from_json(json: &str) -> Result<Self, ZoneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, ZoneError> {
        Ok(serde_json::to_string(self)?)
    }
}
