//! Stress model seam
//!
//! Prediction is isolated behind the `StressModel` trait so the screening
//! pipeline never depends on a concrete backend. A model receives the full
//! feature vector (callers that wrap matrix backends can lay it out as a
//! single-row batch with `FeatureVector::to_row`) and returns an integer
//! class; anything outside 0-4 surfaces downstream as the Unknown sentinel
//! rather than an error.
//!
//! `ThresholdModel` is the built-in backend: an ordered first-match rule
//! list loadable from JSON, mirroring how the screening thresholds were
//! fitted on the original sleep dataset.

use serde::{Deserialize, Serialize};

use crate::error::ScreenError;
use crate::fields::FieldId;
use crate::types::FeatureVector;

/// A stress predictor over one normalized feature vector.
pub trait StressModel {
    /// Short identifier recorded in reports and diagnostics.
    fn name(&self) -> &str;

    /// Predict the stress class for one subject.
    fn predict(&self, features: &FeatureVector) -> Result<i64, ScreenError>;
}

/// One rule: fires when the named feature is at or below `max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub feature: FieldId,
    pub max: f64,
    pub class: i64,
}

/// Ordered rule list; the first matching rule decides the class, and
/// `default_class` covers vectors no rule matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdModel {
    #[serde(default = "default_model_name")]
    pub name: String,
    pub rules: Vec<ThresholdRule>,
    pub default_class: i64,
}

fn default_model_name() -> String {
    "threshold".to_string()
}

impl ThresholdModel {
    /// The built-in screening model. Classes follow the sleep-duration
    /// bands observed in the fitted dataset: under four hours of sleep is
    /// max stress, and each additional hour steps one class down.
    pub fn default_screening() -> Self {
        ThresholdModel {
            name: "sleep-threshold-v1".to_string(),
            rules: vec![
                ThresholdRule { feature: FieldId::SleepingHours, max: 4.0, class: 4 },
                ThresholdRule { feature: FieldId::SleepingHours, max: 5.0, class: 3 },
                ThresholdRule { feature: FieldId::SleepingHours, max: 6.0, class: 2 },
                ThresholdRule { feature: FieldId::SleepingHours, max: 7.0, class: 1 },
            ],
            default_class: 0,
        }
    }

    /// Load a model definition from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ScreenError> {
        let model: ThresholdModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Serialize the definition to pretty JSON.
    pub fn to_json(&self) -> Result<String, ScreenError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ScreenError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.max.is_finite() {
                return Err(ScreenError::InvalidModel(format!(
                    "rule {} for `{}` has a non-finite threshold",
                    index,
                    rule.feature.as_str()
                )));
            }
        }
        Ok(())
    }
}

impl StressModel for ThresholdModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64, ScreenError> {
        for rule in &self.rules {
            if features.get(rule.feature) <= rule.max {
                return Ok(rule.class);
            }
        }
        Ok(self.default_class)
    }
}
