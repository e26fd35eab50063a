//! Stress screening report encoder
//!
//! Assembles the versioned `ssr.v1` report envelope from the outputs of
//! normalization, classification and prediction. Every report carries the
//! producing library's identity and a stable instance id, so downstream
//! consumers can trace which deployment emitted it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ScreenError;
use crate::intake::IntakeForm;
use crate::types::{
    CategoryReading, NormalizedIntake, Producer, ScreeningReport, StressAssessment, StressLevel,
};
use crate::{PRODUCER_NAME, STRESS_VERSION};

/// Report envelope version.
pub const REPORT_VERSION: &str = "ssr.v1";

/// Builds `ssr.v1` screening reports.
pub struct ReportEncoder {
    instance_id: String,
}

impl ReportEncoder {
    /// Create an encoder with a random instance id.
    pub fn new() -> Self {
        ReportEncoder {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a fixed instance id, for deployments that
    /// track producers externally.
    pub fn with_instance_id(instance_id: String) -> Self {
        ReportEncoder { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode a report stamped with the current time.
    pub fn encode(
        &self,
        form: &IntakeForm,
        normalized: &NormalizedIntake,
        readings: Vec<CategoryReading>,
        class: i64,
    ) -> ScreeningReport {
        self.encode_at(form, normalized, readings, class, Utc::now())
    }

    /// Encode a report with an explicit timestamp.
    pub fn encode_at(
        &self,
        form: &IntakeForm,
        normalized: &NormalizedIntake,
        readings: Vec<CategoryReading>,
        class: i64,
        computed_at: DateTime<Utc>,
    ) -> ScreeningReport {
        let stress = build_assessment(class);
        let recommendations = recommendations_for(stress.level)
            .iter()
            .map(|s| s.to_string())
            .collect();
        ScreeningReport {
            report_version: REPORT_VERSION.to_string(),
            producer: self.build_producer(),
            computed_at_utc: computed_at.to_rfc3339(),
            stress,
            marital_status: form.marital_status.label().to_string(),
            gender: form.gender.label().to_string(),
            readings,
            defaulted_fields: normalized.defaulted_fields.clone(),
            features: normalized.features,
            recommendations,
        }
    }

    /// Encode straight to pretty-printed JSON.
    pub fn encode_to_json(
        &self,
        form: &IntakeForm,
        normalized: &NormalizedIntake,
        readings: Vec<CategoryReading>,
        class: i64,
    ) -> Result<String, ScreenError> {
        let report = self.encode(form, normalized, readings, class);
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn build_producer(&self) -> Producer {
        Producer {
            name: PRODUCER_NAME.to_string(),
            version: STRESS_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        }
    }
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn build_assessment(class: i64) -> StressAssessment {
    let level = StressLevel::from_class(class);
    StressAssessment {
        class,
        level,
        label: level.label().to_string(),
    }
}

/// Guidance lines attached to each stress level.
pub fn recommendations_for(level: StressLevel) -> &'static [&'static str] {
    match level {
        StressLevel::NoStress => &["Sleep pattern looks healthy. Keep the current routine."],
        StressLevel::Low => &[
            "Mild stress signals detected. Wind down earlier and limit screens before bed.",
        ],
        StressLevel::Moderate => &[
            "Aim for 7-9 hours of sleep.",
            "Add a relaxation practice before bed.",
        ],
        StressLevel::High => &[
            "Prioritize sleep tonight.",
            "Reduce stimulants late in the day.",
            "Consider professional support if this level persists.",
        ],
        StressLevel::Max => &[
            "Severe stress signals detected.",
            "Seek professional guidance.",
            "Track sleep closely over the coming week.",
        ],
        StressLevel::Unknown => &["Prediction unavailable. Review the model configuration."],
    }
}
