//! Core types for the Synheart Stress pipeline
//!
//! This module defines the data structures that flow through each stage:
//! the typed feature vector, the per-field category readings, the stress
//! level mapping, and the screening report payload.

use serde::{Deserialize, Serialize};

use crate::fields::{FieldId, FIELD_COUNT};

/// Ordered numeric encoding of all twelve inputs, consumed by the inference
/// collaborator.
///
/// Field order is an invariant: the external model was trained on exactly
/// this column order, and any permutation silently produces wrong
/// predictions. `to_array` is the single place the order is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Age in years
    pub age: f64,
    /// Marital status: Yes = 1, No = 0
    pub marital_status: f64,
    /// Gender: Male = 1, Female = 0
    pub gender: f64,
    /// Body mass index
    pub bmi: f64,
    /// Snoring rate (0 when left blank)
    pub snoring_rate: f64,
    /// Respiration rate (breaths per minute)
    pub respiration_rate: f64,
    /// Body temperature (°F)
    pub body_temperature: f64,
    /// Limb movement rate (0 when left blank)
    pub limb_movement: f64,
    /// Blood oxygen saturation
    pub blood_oxygen: f64,
    /// Eye movement rate (0 when left blank)
    pub eye_movement: f64,
    /// Sleeping hours per night
    pub sleeping_hours: f64,
    /// Heart rate (bpm)
    pub heart_rate: f64,
}

impl FeatureVector {
    /// The vector in model order.
    pub fn to_array(&self) -> [f64; FIELD_COUNT] {
        [
            self.age,
            self.marital_status,
            self.gender,
            self.bmi,
            self.snoring_rate,
            self.respiration_rate,
            self.body_temperature,
            self.limb_movement,
            self.blood_oxygen,
            self.eye_movement,
            self.sleeping_hours,
            self.heart_rate,
        ]
    }

    /// The vector as a single-row 2-D shape, the form inference backends
    /// were trained against.
    pub fn to_row(&self) -> [[f64; FIELD_COUNT]; 1] {
        [self.to_array()]
    }

    /// Value of one field.
    pub fn get(&self, field: FieldId) -> f64 {
        match field {
            FieldId::Age => self.age,
            FieldId::MaritalStatus => self.marital_status,
            FieldId::Gender => self.gender,
            FieldId::Bmi => self.bmi,
            FieldId::SnoringRate => self.snoring_rate,
            FieldId::RespirationRate => self.respiration_rate,
            FieldId::BodyTemperature => self.body_temperature,
            FieldId::LimbMovement => self.limb_movement,
            FieldId::BloodOxygen => self.blood_oxygen,
            FieldId::EyeMovement => self.eye_movement,
            FieldId::SleepingHours => self.sleeping_hours,
            FieldId::HeartRate => self.heart_rate,
        }
    }
}

/// A validated intake: the feature vector plus which free-text fields were
/// coerced to 0 by the blank-policy.
///
/// The original typed scalars are the vector's named fields; nothing is lost
/// by the encoding except the categorical display strings, which callers
/// still hold on the intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIntake {
    pub features: FeatureVector,
    /// Free-text fields that arrived blank or unparsable and defaulted to 0.
    pub defaulted_fields: Vec<FieldId>,
}

/// Named stress level mapped from the model's integer class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    NoStress,
    Low,
    Moderate,
    High,
    Max,
    /// Sentinel for a class outside 0-4. The model is contracted to emit
    /// only 0-4, so this never fails the pipeline.
    Unknown,
}

impl StressLevel {
    /// Map a model output class onto a level. Total: out-of-range input
    /// yields `Unknown` rather than an error.
    pub fn from_class(class: i64) -> Self {
        match class {
            0 => StressLevel::NoStress,
            1 => StressLevel::Low,
            2 => StressLevel::Moderate,
            3 => StressLevel::High,
            4 => StressLevel::Max,
            _ => StressLevel::Unknown,
        }
    }

    /// The ordinal class, when this is a known level.
    pub fn class(&self) -> Option<i64> {
        match self {
            StressLevel::NoStress => Some(0),
            StressLevel::Low => Some(1),
            StressLevel::Moderate => Some(2),
            StressLevel::High => Some(3),
            StressLevel::Max => Some(4),
            StressLevel::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::NoStress => "no_stress",
            StressLevel::Low => "low",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
            StressLevel::Max => "max",
            StressLevel::Unknown => "unknown",
        }
    }

    /// Display label shown with the result.
    pub fn label(&self) -> &'static str {
        match self {
            StressLevel::NoStress => "No Stress",
            StressLevel::Low => "Low Stress",
            StressLevel::Moderate => "Moderate Stress",
            StressLevel::High => "High Stress",
            StressLevel::Max => "Max Stress",
            StressLevel::Unknown => "Unknown",
        }
    }
}

/// Presentation severity tier attached to a category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Normal,
    /// No clinical weight either way (demographic bands and the like).
    Neutral,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Normal => "normal",
            Severity::Neutral => "neutral",
        }
    }
}

/// One physiological field's interpretation: the value the model saw, its
/// category band, and the presentation severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReading {
    pub field: FieldId,
    pub value: f64,
    pub label: String,
    pub severity: Severity,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// The model's verdict for one intake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressAssessment {
    /// Raw class returned by the inference collaborator.
    pub class: i64,
    pub level: StressLevel,
    pub label: String,
}

/// Complete screening report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub report_version: String,
    pub producer: Producer,
    pub computed_at_utc: String,
    pub stress: StressAssessment,
    /// Marital status as entered ("Yes"/"No").
    pub marital_status: String,
    /// Gender as entered ("Male"/"Female").
    pub gender: String,
    /// One reading per physiological field, in field order.
    pub readings: Vec<CategoryReading>,
    /// Free-text fields the blank-policy defaulted to 0.
    pub defaulted_fields: Vec<FieldId>,
    pub features: FeatureVector,
    pub recommendations: Vec<String>,
}
