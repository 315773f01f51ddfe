//! Error types for the zone engine

use thiserror::Error;

/// Errors that can occur during classification or at the JSON boundary
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("Invalid zone config: low {low} exceeds high {high}")]
    InvalidConfig { low: u16, high: u16 },

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
