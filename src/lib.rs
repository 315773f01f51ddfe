//! zone2-core - On-device heart-rate zone engine for Zone 2 training apps
//!
//! The engine turns an irregular stream of heart-rate samples into a discrete
//! zone classification, debounced leave-zone alerts, and time-in-zone
//! counters through a deterministic pipeline: ingest validation →
//! classification → transition tracking → accumulation.
//!
//! ## Modules
//!
//! - **ingest/classifier/tracker/accumulator**: the pipeline stages
//! - **session**: stateful orchestrator producing per-tick snapshots
//! - **adapters**: BLE payload decoding and the platform sink interface

pub mod accumulator;
pub mod adapters;
pub mod classifier;
pub mod error;
pub mod ingest;
pub mod session;
pub mod settings;
pub mod tracker;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use adapters::{SampleSink, SourceStatus};
pub use classifier::ZoneClassifier;
pub use error::ZoneError;
pub use session::ZoneSession;
pub use settings::UserSettings;
pub use types::{AlertEvent, HeartRateSample, ZoneConfig, ZoneSnapshot, ZoneState};

/// Engine version embedded in the FFI surface
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
