//! Intake normalization
//!
//! This module turns a typed intake form into the model-ready feature vector:
//! - Categorical selections encoded to 0/1
//! - Free-text measurement fields coerced (blank or unparsable → 0)
//! - Every numeric field range-checked, in field order, against FIELD_SPECS
//!
//! An intake either normalizes completely or is rejected with a validation
//! failure; there is no partial output.

use crate::error::{RangeViolation, ValidationFailure};
use crate::fields::{FieldId, FIELD_SPECS};
use crate::intake::IntakeForm;
use crate::types::{FeatureVector, NormalizedIntake};

/// Normalizer for converting intake forms to validated feature vectors
pub struct Normalizer;

impl Normalizer {
    /// Normalize an intake form.
    ///
    /// Pure function of the form: parses the free-text fields under the
    /// blank-to-zero policy, encodes the categorical selections, then
    /// validates every field in the fixed field order. Returns the feature
    /// vector only when every field is inside its documented domain.
    pub fn normalize(form: &IntakeForm) -> Result<NormalizedIntake, ValidationFailure> {
        let mut defaulted_fields = Vec::new();

        let snoring_rate = parse_free_text(&form.snoring_rate).unwrap_or_else(|| {
            defaulted_fields.push(FieldId::SnoringRate);
            0.0
        });
        let limb_movement = parse_free_text(&form.limb_movement).unwrap_or_else(|| {
            defaulted_fields.push(FieldId::LimbMovement);
            0.0
        });
        let eye_movement = parse_free_text(&form.eye_movement).unwrap_or_else(|| {
            defaulted_fields.push(FieldId::EyeMovement);
            0.0
        });

        let features = FeatureVector {
            age: form.age as f64,
            marital_status: form.marital_status.encode(),
            gender: form.gender.encode(),
            bmi: form.bmi,
            snoring_rate,
            respiration_rate: form.respiration_rate,
            body_temperature: form.body_temperature,
            limb_movement,
            blood_oxygen: form.blood_oxygen,
            eye_movement,
            sleeping_hours: form.sleeping_hours,
            heart_rate: form.heart_rate,
        };

        validate(&features)?;

        Ok(NormalizedIntake {
            features,
            defaulted_fields,
        })
    }
}

/// One rejected intake in a batch, by input position.
#[derive(Debug, Clone)]
pub struct RejectedIntake {
    pub index: usize,
    pub failure: ValidationFailure,
}

/// Validate a batch of intake forms, returning only the rejected ones.
pub fn validate_batch(forms: &[IntakeForm]) -> Vec<RejectedIntake> {
    forms
        .iter()
        .enumerate()
        .filter_map(|(index, form)| match Normalizer::normalize(form) {
            Ok(_) => None,
            Err(failure) => Some(RejectedIntake { index, failure }),
        })
        .collect()
}

/// Parse one free-text measurement field.
///
/// Blank, unparsable, and non-finite inputs all yield None; the caller
/// applies the zero default. A value that parses (including a negative one)
/// goes on to range validation like any other number.
fn parse_free_text(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Check every field against its documented domain, in field order.
fn validate(features: &FeatureVector) -> Result<(), ValidationFailure> {
    let mut violations: Vec<RangeViolation> = Vec::new();

    for spec in FIELD_SPECS.iter() {
        let domain = match spec.domain {
            Some(domain) => domain,
            None => continue,
        };
        let value = features.get(spec.field);
        if !domain.contains(value) {
            violations.push(RangeViolation {
                field: spec.field,
                value,
                min: domain.min,
                max: domain.max,
            });
        }
    }

    match violations.split_first() {
        None => Ok(()),
        Some((first, rest)) => Err(ValidationFailure::new(first.clone(), rest.to_vec())),
    }
}
