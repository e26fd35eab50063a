//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Stress.
//! It orchestrates the full pipeline from intake JSON to screening report.

use chrono::Utc;

use crate::classifier::{Classifier, ClassifierConfig};
use crate::error::ScreenError;
use crate::history::{HistoryRecord, SessionHistory};
use crate::intake::IntakeForm;
use crate::model::{StressModel, ThresholdModel};
use crate::normalizer::Normalizer;
use crate::report::ReportEncoder;
use crate::types::ScreeningReport;

/// Screen one intake with the built-in model and the default band tables.
///
/// # Arguments
/// * `form` - A parsed intake form
///
/// # Returns
/// The full screening report, or the first error in the pipeline.
///
/// # Example
/// ```ignore
/// let form = IntakeForm::parse_json(intake_json)?;
/// let report = screen_intake(&form)?;
/// println!("{}", report.stress.label);
/// ```
pub fn screen_intake(form: &IntakeForm) -> Result<ScreeningReport, ScreenError> {
    let model = ThresholdModel::default_screening();
    screen_intake_with(form, &model, &ClassifierConfig::default())
}

/// Screen one intake with an explicit model and band-table selection.
///
/// Pipeline stages:
/// 1. Normalizer - Default blank fields and validate domains
/// 2. Classifier - Band every physiological value
/// 3. StressModel - Predict the stress class
/// 4. ReportEncoder - Encode the versioned report
pub fn screen_intake_with(
    form: &IntakeForm,
    model: &dyn StressModel,
    config: &ClassifierConfig,
) -> Result<ScreeningReport, ScreenError> {
    // Stage 1: Normalize the form into a validated feature vector
    let normalized = Normalizer::normalize(form)?;

    // Stage 2: Classify each field against its band table
    let readings = Classifier::classify(&normalized.features, config);

    // Stage 3: Predict the stress class
    let class = model.predict(&normalized.features)?;

    // Stage 4: Encode the report
    let encoder = ReportEncoder::new();
    Ok(encoder.encode(form, &normalized, readings, class))
}

/// JSON-in, JSON-out convenience over [`screen_intake`].
///
/// # Example
/// ```ignore
/// let report_json = screen_intake_json(intake_json)?;
/// ```
pub fn screen_intake_json(intake_json: &str) -> Result<String, ScreenError> {
    let form = IntakeForm::parse_json(intake_json)?;
    let report = screen_intake(&form)?;
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Stateful processor for a session of screenings.
///
/// Use this when consecutive intakes belong together: every successful
/// screening is appended to the session history, which can be exported as
/// CSV at any point. Failed screenings leave the history untouched.
pub struct StressProcessor {
    config: ClassifierConfig,
    model: Box<dyn StressModel>,
    encoder: ReportEncoder,
    history: SessionHistory,
}

impl Default for StressProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl StressProcessor {
    /// Create a processor with the built-in model and default tables.
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
            model: Box::new(ThresholdModel::default_screening()),
            encoder: ReportEncoder::new(),
            history: SessionHistory::new(),
        }
    }

    /// Replace the prediction model.
    pub fn with_model(mut self, model: Box<dyn StressModel>) -> Self {
        self.model = model;
        self
    }

    /// Replace the band-table selection.
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin the report producer's instance id.
    pub fn with_instance_id(mut self, instance_id: String) -> Self {
        self.encoder = ReportEncoder::with_instance_id(instance_id);
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn session_id(&self) -> &str {
        self.history.session_id()
    }

    /// Screen one intake and append the outcome to the session history.
    pub fn screen(&mut self, form: &IntakeForm) -> Result<ScreeningReport, ScreenError> {
        let normalized = Normalizer::normalize(form)?;
        let readings = Classifier::classify(&normalized.features, &self.config);
        let class = self.model.predict(&normalized.features)?;

        let computed_at = Utc::now();
        let report = self
            .encoder
            .encode_at(form, &normalized, readings, class, computed_at);

        let record = HistoryRecord::from_parts(
            computed_at,
            &report.marital_status,
            &report.gender,
            &report.features,
            &report.readings,
            &report.stress,
        );
        self.history.append(record);

        Ok(report)
    }

    /// Screen a JSON intake and return the report as pretty JSON.
    pub fn screen_json(&mut self, intake_json: &str) -> Result<String, ScreenError> {
        let form = IntakeForm::parse_json(intake_json)?;
        let report = self.screen(&form)?;
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Screen a batch, one result per form. Each form rejects individually
    /// without affecting the rest of the batch.
    pub fn screen_batch(
        &mut self,
        forms: &[IntakeForm],
    ) -> Vec<Result<ScreeningReport, ScreenError>> {
        forms.iter().map(|form| self.screen(form)).collect()
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Export the session history as CSV text.
    pub fn export_history_csv(&self) -> Result<String, ScreenError> {
        self.history.to_csv()
    }

    /// Drop the session's records; identity and configuration stay.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{BMI_REVISED, BODY_TEMPERATURE_CLINICAL};
    use crate::intake::{Gender, MaritalStatus};
    use crate::model::ThresholdRule;
    use crate::types::StressLevel;

    fn sample_intake_json() -> &'static str {
        r#"{
            "age": 22,
            "marital_status": "yes",
            "gender": "male",
            "bmi": 25.0,
            "snoring_rate": "",
            "respiration_rate": 15.0,
            "body_temperature": 90.0,
            "limb_movement": "",
            "blood_oxygen": 80.0,
            "eye_movement": "",
            "sleeping_hours": 8.0,
            "heart_rate": 70.0
        }"#
    }

    fn make_test_form() -> IntakeForm {
        IntakeForm::parse_json(sample_intake_json()).unwrap()
    }

    fn make_invalid_form() -> IntakeForm {
        IntakeForm {
            age: 17,
            marital_status: MaritalStatus::No,
            gender: Gender::Female,
            bmi: 41.0,
            snoring_rate: "5".to_string(),
            respiration_rate: 15.0,
            body_temperature: 98.0,
            limb_movement: "3".to_string(),
            blood_oxygen: 95.0,
            eye_movement: "10".to_string(),
            sleeping_hours: 7.0,
            heart_rate: 60.0,
        }
    }

    #[test]
    fn test_screen_intake_end_to_end() {
        let report = screen_intake(&make_test_form()).unwrap();
        assert_eq!(report.stress.class, 0);
        assert_eq!(report.stress.label, "No Stress");
        assert_eq!(report.readings.len(), 10);
        assert_eq!(report.readings[1].label, "Overweight");
        assert_eq!(report.readings[4].label, "Hypothermia");
        assert_eq!(report.defaulted_fields.len(), 3);
        assert_eq!(report.features.snoring_rate, 0.0);
    }

    #[test]
    fn test_screen_intake_json_payload() {
        let json = screen_intake_json(sample_intake_json()).unwrap();

        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(payload["report_version"], "ssr.v1");
        assert_eq!(payload["producer"]["name"], "synheart-stress");
        assert_eq!(payload["stress"]["class"], 0);
        assert_eq!(payload["stress"]["label"], "No Stress");
        assert_eq!(payload["marital_status"], "Yes");
        assert_eq!(payload["gender"], "Male");
        assert_eq!(payload["readings"][9]["label"], "Normal");
    }

    #[test]
    fn test_revised_bmi_table_changes_reading() {
        let config = ClassifierConfig {
            bmi: &BMI_REVISED,
            body_temperature: &BODY_TEMPERATURE_CLINICAL,
        };
        let model = ThresholdModel::default_screening();
        let report = screen_intake_with(&make_test_form(), &model, &config).unwrap();
        assert_eq!(report.readings[1].label, "Normal weight");
    }

    #[test]
    fn test_rejected_intake_reports_all_violations() {
        let err = screen_intake(&make_invalid_form()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "intake rejected: `age` must be between 18 and 80, got 17"
        );
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[1].to_string(),
            "`bmi` must be between 18 and 40, got 41"
        );
    }

    #[test]
    fn test_processor_accumulates_history() {
        let mut processor = StressProcessor::new();
        processor.screen(&make_test_form()).unwrap();
        processor.screen(&make_test_form()).unwrap();
        assert_eq!(processor.history().len(), 2);

        let csv_text = processor.export_history_csv().unwrap();
        assert_eq!(csv_text.lines().count(), 3);
        let last = processor.history().records().last().unwrap();
        assert_eq!(last.stress_label, "No Stress");
        assert_eq!(last.bmi_category, "Overweight");
    }

    #[test]
    fn test_rejection_leaves_history_untouched() {
        let mut processor = StressProcessor::new();
        processor.screen(&make_test_form()).unwrap();
        assert!(processor.screen(&make_invalid_form()).is_err());
        assert_eq!(processor.history().len(), 1);
    }

    #[test]
    fn test_unexpected_class_still_records() {
        let model = ThresholdModel {
            name: "wild".to_string(),
            rules: vec![ThresholdRule {
                feature: crate::fields::FieldId::SleepingHours,
                max: 24.0,
                class: 9,
            }],
            default_class: 0,
        };
        let mut processor = StressProcessor::new().with_model(Box::new(model));
        let report = processor.screen(&make_test_form()).unwrap();
        assert_eq!(report.stress.level, StressLevel::Unknown);
        assert_eq!(report.stress.label, "Unknown");
        assert_eq!(processor.history().len(), 1);
        assert_eq!(processor.history().records()[0].stress_class, 9);
        assert_eq!(processor.history().records()[0].stress_label, "Unknown");
    }

    #[test]
    fn test_screen_batch_rejects_individually() {
        let mut processor = StressProcessor::new();
        let results =
            processor.screen_batch(&[make_test_form(), make_invalid_form(), make_test_form()]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(processor.history().len(), 2);
    }

    #[test]
    fn test_clear_history() {
        let mut processor = StressProcessor::new();
        processor.screen(&make_test_form()).unwrap();
        let session = processor.session_id().to_string();
        processor.clear_history();
        assert!(processor.history().is_empty());
        assert_eq!(processor.session_id(), session);
    }

    #[test]
    fn test_processor_builder_overrides() {
        let processor = StressProcessor::new()
            .with_config(ClassifierConfig {
                bmi: &BMI_REVISED,
                body_temperature: &BODY_TEMPERATURE_CLINICAL,
            })
            .with_instance_id("proc-1".to_string());
        assert_eq!(processor.model_name(), "sleep-threshold-v1");
    }
}
