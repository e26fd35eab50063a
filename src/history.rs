//! Session history
//!
//! An in-memory, append-only log of completed screenings. Failed intakes
//! never reach it. The CSV export always starts with the header row, so an
//! empty session exports as the header line alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScreenError;
use crate::fields::FieldId;
use crate::types::{CategoryReading, FeatureVector, StressAssessment};

/// Column order of the CSV export. Kept in lockstep with the serde field
/// order of `HistoryRecord`.
pub const HISTORY_HEADERS: [&str; 25] = [
    "recorded_at",
    "age",
    "marital_status",
    "gender",
    "bmi",
    "snoring_rate",
    "respiration_rate",
    "body_temperature",
    "limb_movement",
    "blood_oxygen",
    "eye_movement",
    "sleeping_hours",
    "heart_rate",
    "age_category",
    "bmi_category",
    "snoring_rate_category",
    "respiration_rate_category",
    "body_temperature_category",
    "limb_movement_category",
    "blood_oxygen_category",
    "eye_movement_category",
    "sleeping_hours_category",
    "heart_rate_category",
    "stress_class",
    "stress_label",
];

/// One completed screening: the raw values as screened, the category label
/// for every banded field, and the stress outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub recorded_at: DateTime<Utc>,
    pub age: i64,
    pub marital_status: String,
    pub gender: String,
    pub bmi: f64,
    pub snoring_rate: f64,
    pub respiration_rate: f64,
    pub body_temperature: f64,
    pub limb_movement: f64,
    pub blood_oxygen: f64,
    pub eye_movement: f64,
    pub sleeping_hours: f64,
    pub heart_rate: f64,
    pub age_category: String,
    pub bmi_category: String,
    pub snoring_rate_category: String,
    pub respiration_rate_category: String,
    pub body_temperature_category: String,
    pub limb_movement_category: String,
    pub blood_oxygen_category: String,
    pub eye_movement_category: String,
    pub sleeping_hours_category: String,
    pub heart_rate_category: String,
    pub stress_class: i64,
    pub stress_label: String,
}

impl HistoryRecord {
    /// Assemble a record from the pieces of a finished screening.
    pub fn from_parts(
        recorded_at: DateTime<Utc>,
        marital_status: &str,
        gender: &str,
        features: &FeatureVector,
        readings: &[CategoryReading],
        stress: &StressAssessment,
    ) -> Self {
        HistoryRecord {
            recorded_at,
            age: features.age as i64,
            marital_status: marital_status.to_string(),
            gender: gender.to_string(),
            bmi: features.bmi,
            snoring_rate: features.snoring_rate,
            respiration_rate: features.respiration_rate,
            body_temperature: features.body_temperature,
            limb_movement: features.limb_movement,
            blood_oxygen: features.blood_oxygen,
            eye_movement: features.eye_movement,
            sleeping_hours: features.sleeping_hours,
            heart_rate: features.heart_rate,
            age_category: label_for(readings, FieldId::Age),
            bmi_category: label_for(readings, FieldId::Bmi),
            snoring_rate_category: label_for(readings, FieldId::SnoringRate),
            respiration_rate_category: label_for(readings, FieldId::RespirationRate),
            body_temperature_category: label_for(readings, FieldId::BodyTemperature),
            limb_movement_category: label_for(readings, FieldId::LimbMovement),
            blood_oxygen_category: label_for(readings, FieldId::BloodOxygen),
            eye_movement_category: label_for(readings, FieldId::EyeMovement),
            sleeping_hours_category: label_for(readings, FieldId::SleepingHours),
            heart_rate_category: label_for(readings, FieldId::HeartRate),
            stress_class: stress.class,
            stress_label: stress.label.clone(),
        }
    }
}

fn label_for(readings: &[CategoryReading], field: FieldId) -> String {
    readings
        .iter()
        .find(|r| r.field == field)
        .map(|r| r.label.clone())
        .unwrap_or_default()
}

/// Append-only log of one screening session.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    session_id: String,
    started_at: DateTime<Utc>,
    records: Vec<HistoryRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        SessionHistory {
            session_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn append(&mut self, record: HistoryRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all records; the session identity stays.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Export the session as CSV text, header row first.
    pub fn to_csv(&self) -> Result<String, ScreenError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(HISTORY_HEADERS)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ScreenError::ExportError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ScreenError::ExportError(e.to_string()))
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}
