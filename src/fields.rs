//! Intake field definitions
//!
//! This module defines the twelve screening fields in their model-mandated
//! order, together with the static per-field metadata used for validation:
//! display names, inclusive numeric domains, and the blank-to-zero parse
//! policy for the three free-text fields.

use serde::{Deserialize, Serialize};

/// Number of fields in a complete intake (and in the feature vector).
pub const FIELD_COUNT: usize = 12;

/// Identifier for one intake field.
///
/// Variant order matches the feature-vector order; reordering variants here
/// would silently break inference, so the order is asserted in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Age,
    MaritalStatus,
    Gender,
    Bmi,
    SnoringRate,
    RespirationRate,
    BodyTemperature,
    LimbMovement,
    BloodOxygen,
    EyeMovement,
    SleepingHours,
    HeartRate,
}

impl FieldId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Age => "age",
            FieldId::MaritalStatus => "marital_status",
            FieldId::Gender => "gender",
            FieldId::Bmi => "bmi",
            FieldId::SnoringRate => "snoring_rate",
            FieldId::RespirationRate => "respiration_rate",
            FieldId::BodyTemperature => "body_temperature",
            FieldId::LimbMovement => "limb_movement",
            FieldId::BloodOxygen => "blood_oxygen",
            FieldId::EyeMovement => "eye_movement",
            FieldId::SleepingHours => "sleeping_hours",
            FieldId::HeartRate => "heart_rate",
        }
    }

    /// Human-readable name for presentation surfaces.
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldId::Age => "Age",
            FieldId::MaritalStatus => "Marital Status",
            FieldId::Gender => "Gender",
            FieldId::Bmi => "BMI",
            FieldId::SnoringRate => "Snoring Rate",
            FieldId::RespirationRate => "Respiration Rate",
            FieldId::BodyTemperature => "Body Temperature",
            FieldId::LimbMovement => "Limb Movement",
            FieldId::BloodOxygen => "Blood Oxygen",
            FieldId::EyeMovement => "Eye Movement",
            FieldId::SleepingHours => "Sleeping Hours",
            FieldId::HeartRate => "Heart Rate",
        }
    }
}

/// Inclusive numeric domain for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const fn new(min: f64, max: f64) -> Self {
        Domain { min, max }
    }

    /// Whether `value` lies inside the domain. NaN is never inside.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Static metadata for one intake field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub field: FieldId,
    /// Measurement unit, where one exists.
    pub unit: Option<&'static str>,
    /// Inclusive valid range; `None` for the two categorical fields.
    pub domain: Option<Domain>,
    /// Free-text field: blank or unparsable input is coerced to 0, never
    /// rejected.
    pub blank_to_zero: bool,
}

/// The twelve fields in validation (and feature-vector) order.
///
/// Range checks run through this table front to back, so the first violation
/// reported to the caller is always the earliest field in this order.
pub static FIELD_SPECS: [FieldSpec; FIELD_COUNT] = [
    FieldSpec {
        field: FieldId::Age,
        unit: Some("years"),
        domain: Some(Domain::new(18.0, 80.0)),
        blank_to_zero: false,
    },
    FieldSpec {
        field: FieldId::MaritalStatus,
        unit: None,
        domain: None,
        blank_to_zero: false,
    },
    FieldSpec {
        field: FieldId::Gender,
        unit: None,
        domain: None,
        blank_to_zero: false,
    },
    FieldSpec {
        field: FieldId::Bmi,
        unit: None,
        domain: Some(Domain::new(18.0, 40.0)),
        blank_to_zero: false,
    },
    FieldSpec {
        field: FieldId::SnoringRate,
        unit: None,
        domain: Some(Domain::new(0.0, 50.0)),
        blank_to_zero: true,
    },
    FieldSpec {
        field: FieldId::RespirationRate,
        unit: Some("breaths/min"),
        domain: Some(Domain::new(0.0, 50.0)),
        blank_to_zero: false,
    },
    FieldSpec {
        field: FieldId::BodyTemperature,
        unit: Some("°F"),
        domain: Some(Domain::new(60.0, 110.0)),
        blank_to_zero: false,
    },
    FieldSpec {
        field: FieldId::LimbMovement,
        unit: None,
        domain: Some(Domain::new(0.0, 35.0)),
        blank_to_zero: true,
    },
    FieldSpec {
        field: FieldId::BloodOxygen,
        unit: Some("%"),
        domain: Some(Domain::new(60.0, 110.0)),
        blank_to_zero: false,
    },
    FieldSpec {
        field: FieldId::EyeMovement,
        unit: None,
        domain: Some(Domain::new(0.0, 35.0)),
        blank_to_zero: true,
    },
    FieldSpec {
        field: FieldId::SleepingHours,
        unit: Some("hours"),
        domain: Some(Domain::new(0.0, 24.0)),
        blank_to_zero: false,
    },
    FieldSpec {
        field: FieldId::HeartRate,
        unit: Some("bpm"),
        domain: Some(Domain::new(30.0, 100.0)),
        blank_to_zero: false,
    },
];

/// Look up the static spec for a field.
pub fn spec_for(field: FieldId) -> &'static FieldSpec {
    // FIELD_SPECS covers every variant, in order.
    FIELD_SPECS
        .iter()
        .find(|s| s.field == field)
        .unwrap_or(&FIELD_SPECS[0])
}
