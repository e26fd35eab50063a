//! Error types for Synheart Stress
//!
//! The normalizer rejects an intake with a `ValidationFailure` that surfaces
//! the first out-of-range field (fail-fast, in field order) while carrying the
//! complete violation list. Everything else funnels into `ScreenError`.

use serde::Serialize;
use thiserror::Error;

use crate::fields::FieldId;

/// A single field whose value fell outside its documented domain.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("`{}` must be between {} and {}, got {}", .field.as_str(), .min, .max, .value)]
pub struct RangeViolation {
    pub field: FieldId,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Range-validation outcome for a rejected intake.
///
/// `Display` shows only the first violation in field order; the rest are
/// carried so callers can render the complete list.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{first}")]
pub struct ValidationFailure {
    pub first: RangeViolation,
    pub rest: Vec<RangeViolation>,
}

impl ValidationFailure {
    pub fn new(first: RangeViolation, rest: Vec<RangeViolation>) -> Self {
        ValidationFailure { first, rest }
    }

    /// All violations in field order, first included.
    pub fn violations(&self) -> Vec<&RangeViolation> {
        std::iter::once(&self.first).chain(self.rest.iter()).collect()
    }

    pub fn count(&self) -> usize {
        1 + self.rest.len()
    }
}

/// Errors that can occur while screening an intake
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("intake rejected: {0}")]
    Rejected(#[from] ValidationFailure),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse intake: {0}")]
    ParseError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Invalid model definition: {0}")]
    InvalidModel(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Export error: {0}")]
    ExportError(String),
}

impl ScreenError {
    /// The violations behind a rejected intake, if that is what this is.
    pub fn violations(&self) -> Option<Vec<&RangeViolation>> {
        match self {
            ScreenError::Rejected(failure) => Some(failure.violations()),
            _ => None,
        }
    }
}
