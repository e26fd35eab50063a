//! stress.intake.v1 schema definition
//!
//! The typed intake form: twelve screening fields as the user enters them,
//! before normalization. The two categorical fields are closed enums, the
//! three optional measurement fields arrive as free text (blank allowed),
//! everything else is numeric. Unknown fields are rejected at this boundary
//! so schema drift surfaces before validation.

use serde::{Deserialize, Serialize};

use crate::error::ScreenError;

/// Current intake schema version
pub const SCHEMA_VERSION: &str = "stress.intake.v1";

/// Marital status selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Yes,
    No,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Yes => "yes",
            MaritalStatus::No => "no",
        }
    }

    /// Display string as shown on the form.
    pub fn label(&self) -> &'static str {
        match self {
            MaritalStatus::Yes => "Yes",
            MaritalStatus::No => "No",
        }
    }

    /// Feature encoding: Yes = 1, No = 0.
    pub fn encode(&self) -> f64 {
        match self {
            MaritalStatus::Yes => 1.0,
            MaritalStatus::No => 0.0,
        }
    }
}

/// Gender selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Display string as shown on the form.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Feature encoding: Male = 1, Female = 0.
    pub fn encode(&self) -> f64 {
        match self {
            Gender::Male => 1.0,
            Gender::Female => 0.0,
        }
    }
}

/// One screening intake as entered.
///
/// `snoring_rate`, `limb_movement` and `eye_movement` are free text: they
/// may be omitted or blank, and unparsable values coerce to 0 during
/// normalization instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntakeForm {
    pub age: i64,
    pub marital_status: MaritalStatus,
    pub gender: Gender,
    pub bmi: f64,
    #[serde(default)]
    pub snoring_rate: String,
    pub respiration_rate: f64,
    pub body_temperature: f64,
    #[serde(default)]
    pub limb_movement: String,
    pub blood_oxygen: f64,
    #[serde(default)]
    pub eye_movement: String,
    pub sleeping_hours: f64,
    pub heart_rate: f64,
}

impl IntakeForm {
    /// Parse a single intake object from JSON.
    pub fn parse_json(json: &str) -> Result<IntakeForm, ScreenError> {
        let form = serde_json::from_str(json)?;
        Ok(form)
    }

    /// Parse NDJSON (newline-delimited JSON) containing one intake per line.
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<IntakeForm>, ScreenError> {
        let mut forms = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<IntakeForm>(trimmed) {
                Ok(form) => forms.push(form),
                Err(e) => {
                    return Err(ScreenError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(forms)
    }

    /// Parse intake input in any accepted shape: a JSON array, a single JSON
    /// object, or NDJSON.
    pub fn parse_batch(input: &str) -> Result<Vec<IntakeForm>, ScreenError> {
        let trimmed = input.trim();
        if trimmed.starts_with('[') {
            let forms: Vec<IntakeForm> = serde_json::from_str(trimmed)?;
            return Ok(forms);
        }
        // A single object may be pretty-printed across lines, while NDJSON
        // never parses as one value, so try the whole input first.
        if let Ok(form) = serde_json::from_str::<IntakeForm>(trimmed) {
            return Ok(vec![form]);
        }
        Self::parse_ndjson(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_intake_json() -> &'static str {
        r#"{
            "age": 22,
            "marital_status": "yes",
            "gender": "male",
            "bmi": 25.0,
            "snoring_rate": "",
            "respiration_rate": 15.0,
            "body_temperature": 98.6,
            "limb_movement": "4",
            "blood_oxygen": 96.0,
            "eye_movement": "",
            "sleeping_hours": 8.0,
            "heart_rate": 70.0
        }"#
    }

    #[test]
    fn test_parse_single_intake() {
        let form = IntakeForm::parse_json(sample_intake_json()).unwrap();
        assert_eq!(form.age, 22);
        assert_eq!(form.marital_status, MaritalStatus::Yes);
        assert_eq!(form.gender, Gender::Male);
        assert_eq!(form.bmi, 25.0);
        assert_eq!(form.snoring_rate, "");
        assert_eq!(form.limb_movement, "4");
    }

    #[test]
    fn test_optional_text_fields_default_to_blank() {
        let json = r#"{
            "age": 30,
            "marital_status": "no",
            "gender": "female",
            "bmi": 22.0,
            "respiration_rate": 16.0,
            "body_temperature": 98.0,
            "blood_oxygen": 97.0,
            "sleeping_hours": 7.5,
            "heart_rate": 64.0
        }"#;
        let form = IntakeForm::parse_json(json).unwrap();
        assert_eq!(form.snoring_rate, "");
        assert_eq!(form.limb_movement, "");
        assert_eq!(form.eye_movement, "");
    }

    #[test]
    fn test_missing_required_field_is_schema_error() {
        let json = r#"{"age": 30, "marital_status": "no", "gender": "female"}"#;
        let result = IntakeForm::parse_json(json);
        assert!(matches!(result, Err(ScreenError::JsonError(_))));
    }

    #[test]
    fn test_unknown_field_is_schema_error() {
        let mut value: serde_json::Value = serde_json::from_str(sample_intake_json()).unwrap();
        value["shoe_size"] = serde_json::json!(43);
        let result = IntakeForm::parse_json(&value.to_string());
        assert!(matches!(result, Err(ScreenError::JsonError(_))));
    }

    #[test]
    fn test_categorical_fields_reject_other_values() {
        let mut value: serde_json::Value = serde_json::from_str(sample_intake_json()).unwrap();
        value["marital_status"] = serde_json::json!("maybe");
        assert!(IntakeForm::parse_json(&value.to_string()).is_err());

        let mut value: serde_json::Value = serde_json::from_str(sample_intake_json()).unwrap();
        value["gender"] = serde_json::json!("other");
        assert!(IntakeForm::parse_json(&value.to_string()).is_err());
    }

    #[test]
    fn test_age_must_be_integer() {
        let mut value: serde_json::Value = serde_json::from_str(sample_intake_json()).unwrap();
        value["age"] = serde_json::json!(22.5);
        assert!(IntakeForm::parse_json(&value.to_string()).is_err());
    }

    #[test]
    fn test_parse_ndjson_reports_line_numbers() {
        let one_line: String = sample_intake_json().split_whitespace().collect::<Vec<_>>().join(" ");
        let ndjson = format!("{}\n\nnot json\n", one_line);
        let err = IntakeForm::parse_ndjson(&ndjson).unwrap_err();
        match err {
            ScreenError::ParseError(msg) => assert!(msg.contains("line 3")),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_batch_accepts_array_object_and_ndjson() {
        let single = IntakeForm::parse_batch(sample_intake_json()).unwrap();
        assert_eq!(single.len(), 1);

        let one_line: String = sample_intake_json().split_whitespace().collect::<Vec<_>>().join(" ");
        let ndjson = format!("{one_line}\n{one_line}\n");
        let batch = IntakeForm::parse_batch(&ndjson).unwrap();
        assert_eq!(batch.len(), 2);

        let array = format!("[{one_line}, {one_line}, {one_line}]");
        let batch = IntakeForm::parse_batch(&array).unwrap();
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_encodings() {
        assert_eq!(MaritalStatus::Yes.encode(), 1.0);
        assert_eq!(MaritalStatus::No.encode(), 0.0);
        assert_eq!(Gender::Male.encode(), 1.0);
        assert_eq!(Gender::Female.encode(), 0.0);
        assert_eq!(MaritalStatus::Yes.label(), "Yes");
        assert_eq!(Gender::Female.label(), "Female");
    }

    #[test]
    fn test_round_trip_preserves_form() {
        let form = IntakeForm::parse_json(sample_intake_json()).unwrap();
        let json = serde_json::to_string(&form).unwrap();
        let back = IntakeForm::parse_json(&json).unwrap();
        assert_eq!(form, back);
    }
}
