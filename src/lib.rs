//! Synheart Stress - On-device stress screening from sleep physiology
//!
//! Synheart Stress turns one night's physiological readings into a versioned
//! stress screening report through a deterministic pipeline: intake parsing →
//! normalization → descriptor classification → model prediction → report
//! encoding.
//!
//! ## Modules
//!
//! - **Screening Pipeline**: Validate intake forms and produce `ssr.v1` reports
//! - **Session History**: Accumulate completed screenings and export them as CSV

pub mod classifier;
pub mod error;
pub mod fields;
pub mod history;
pub mod intake;
pub mod model;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::{RangeViolation, ScreenError, ValidationFailure};
pub use pipeline::{screen_intake, screen_intake_json, screen_intake_with, StressProcessor};

// Intake schema exports
pub use intake::{IntakeForm, SCHEMA_VERSION};

// Model and report exports
pub use model::{StressModel, ThresholdModel};
pub use report::{ReportEncoder, REPORT_VERSION};
pub use types::{ScreeningReport, StressLevel};

/// Library version embedded in all screening reports
pub const STRESS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for screening reports
pub const PRODUCER_NAME: &str = "synheart-stress";
