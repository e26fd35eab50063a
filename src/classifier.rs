//! Descriptor classification
//!
//! This module maps each validated physiological scalar onto a category
//! label through fixed, ordered threshold bands, and tags every label with a
//! presentation severity derived from keyword sets. Bands are adjacent with
//! no gap: the comparison operator on each upper limit decides which side a
//! boundary value falls on, so the tables here are exact contracts, not
//! approximations.
//!
//! Two fields drifted across deployments (BMI and body temperature); both
//! variants of each table are provided as named statics and the active one
//! is chosen through `ClassifierConfig`.

use crate::fields::FieldId;
use crate::types::{CategoryReading, FeatureVector, Severity};

/// Comparison applied to a band's upper limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Matches values strictly below the limit.
    Exclusive,
    /// Matches values at or below the limit.
    Inclusive,
}

/// One threshold band: values up to `limit` (per `bound`) read as `label`.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub limit: f64,
    pub bound: Bound,
    pub label: &'static str,
}

/// An ordered, non-overlapping band table for one field.
#[derive(Debug, Clone, Copy)]
pub struct BandTable {
    pub name: &'static str,
    /// Bands in ascending limit order; first match wins.
    pub bands: &'static [Band],
    /// Label for values above the last band.
    pub fallback: &'static str,
}

impl BandTable {
    /// Classify a value. Total: anything beyond the last band (including a
    /// NaN fed in outside the validated path) reads as the fallback label.
    pub fn classify(&self, value: f64) -> &'static str {
        for band in self.bands {
            let matched = match band.bound {
                Bound::Exclusive => value < band.limit,
                Bound::Inclusive => value <= band.limit,
            };
            if matched {
                return band.label;
            }
        }
        self.fallback
    }
}

pub static AGE_BANDS: BandTable = BandTable {
    name: "age",
    bands: &[
        Band { limit: 18.0, bound: Bound::Inclusive, label: "Adolescent" },
        Band { limit: 24.0, bound: Bound::Inclusive, label: "Young adult" },
        Band { limit: 45.0, bound: Bound::Inclusive, label: "Adult" },
        Band { limit: 64.0, bound: Bound::Inclusive, label: "Middle-aged" },
    ],
    fallback: "Older adult",
};

/// BMI table with the original cut points (Normal caps at 24.9, and the
/// 29.9-30.0 sliver reads Obese).
pub static BMI_STANDARD: BandTable = BandTable {
    name: "bmi",
    bands: &[
        Band { limit: 18.5, bound: Bound::Exclusive, label: "Underweight" },
        Band { limit: 24.9, bound: Bound::Inclusive, label: "Normal weight" },
        Band { limit: 29.9, bound: Bound::Inclusive, label: "Overweight" },
        Band { limit: 30.0, bound: Bound::Inclusive, label: "Obese" },
    ],
    fallback: "Extremely obese",
};

/// BMI table with the revised conventional 25/30/35 cut points.
pub static BMI_REVISED: BandTable = BandTable {
    name: "bmi_revised",
    bands: &[
        Band { limit: 18.5, bound: Bound::Exclusive, label: "Underweight" },
        Band { limit: 25.0, bound: Bound::Inclusive, label: "Normal weight" },
        Band { limit: 30.0, bound: Bound::Inclusive, label: "Overweight" },
        Band { limit: 35.0, bound: Bound::Inclusive, label: "Obese" },
    ],
    fallback: "Extremely obese",
};

pub static SNORING_RATE_BANDS: BandTable = BandTable {
    name: "snoring_rate",
    bands: &[
        Band { limit: 5.0, bound: Bound::Inclusive, label: "Normal" },
        Band { limit: 15.0, bound: Bound::Inclusive, label: "Mild" },
        Band { limit: 30.0, bound: Bound::Inclusive, label: "Moderate" },
        Band { limit: 45.0, bound: Bound::Inclusive, label: "Heavy" },
    ],
    fallback: "Severe",
};

pub static RESPIRATION_RATE_BANDS: BandTable = BandTable {
    name: "respiration_rate",
    bands: &[
        Band { limit: 11.0, bound: Bound::Inclusive, label: "Hypoventilation" },
        Band { limit: 20.0, bound: Bound::Inclusive, label: "Normal" },
    ],
    fallback: "Hyperventilation",
};

/// Body-temperature table used by current deployments (°F, clinical range).
pub static BODY_TEMPERATURE_CLINICAL: BandTable = BandTable {
    name: "body_temperature_clinical",
    bands: &[
        Band { limit: 97.0, bound: Bound::Exclusive, label: "Hypothermia" },
        Band { limit: 99.5, bound: Bound::Inclusive, label: "Normal" },
    ],
    fallback: "Hyperthermia",
};

/// Body-temperature table from earlier deployments (°F, wide 80-100 band).
pub static BODY_TEMPERATURE_LEGACY: BandTable = BandTable {
    name: "body_temperature_legacy",
    bands: &[
        Band { limit: 80.0, bound: Bound::Exclusive, label: "Low" },
        Band { limit: 100.0, bound: Bound::Inclusive, label: "Normal" },
    ],
    fallback: "High",
};

pub static LIMB_MOVEMENT_BANDS: BandTable = BandTable {
    name: "limb_movement",
    bands: &[
        Band { limit: 5.0, bound: Bound::Inclusive, label: "Normal" },
        Band { limit: 25.0, bound: Bound::Inclusive, label: "Moderate" },
    ],
    fallback: "Severe",
};

pub static BLOOD_OXYGEN_BANDS: BandTable = BandTable {
    name: "blood_oxygen",
    bands: &[
        Band { limit: 69.0, bound: Bound::Inclusive, label: "Cyanosis" },
        Band { limit: 79.0, bound: Bound::Inclusive, label: "Severe hypoxia" },
        Band { limit: 89.0, bound: Bound::Inclusive, label: "Low" },
        Band { limit: 94.0, bound: Bound::Inclusive, label: "Moderate" },
    ],
    fallback: "Normal",
};

pub static EYE_MOVEMENT_BANDS: BandTable = BandTable {
    name: "eye_movement",
    bands: &[
        Band { limit: 25.0, bound: Bound::Inclusive, label: "Normal" },
    ],
    fallback: "High REM",
};

pub static SLEEPING_HOURS_BANDS: BandTable = BandTable {
    name: "sleeping_hours",
    bands: &[
        Band { limit: 6.0, bound: Bound::Inclusive, label: "Deprivation" },
        Band { limit: 9.0, bound: Bound::Inclusive, label: "Normal" },
    ],
    fallback: "Hypersomnia",
};

pub static HEART_RATE_BANDS: BandTable = BandTable {
    name: "heart_rate",
    bands: &[
        Band { limit: 39.0, bound: Bound::Inclusive, label: "Bradycardia" },
        Band { limit: 75.0, bound: Bound::Inclusive, label: "Normal" },
    ],
    fallback: "Tachycardia",
};

/// Labels containing one of these (case-insensitive) read as Critical.
pub const CRITICAL_MARKERS: &[&str] = &[
    "underweight",
    "hypoventilation",
    "bradycardia",
    "hypothermia",
    "deprivation",
    "cyanosis",
    "severe",
];

/// Labels containing one of these read as Warning, unless already Critical.
pub const WARNING_MARKERS: &[&str] = &[
    "overweight",
    "obese",
    "low",
    "high",
    "hyperventilation",
    "hypersomnia",
    "hyperthermia",
    "tachycardia",
    "moderate",
    "heavy",
];

/// Severity tier for a category label, from the fixed keyword sets.
pub fn severity_for_label(label: &str) -> Severity {
    let lowered = label.to_lowercase();
    if CRITICAL_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Severity::Critical;
    }
    if WARNING_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Severity::Warning;
    }
    if lowered.contains("normal") {
        Severity::Normal
    } else {
        Severity::Neutral
    }
}

/// Band-table selection for the two fields whose tables drifted across
/// deployments. The defaults are the current tables.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    pub bmi: &'static BandTable,
    pub body_temperature: &'static BandTable,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            bmi: &BMI_STANDARD,
            body_temperature: &BODY_TEMPERATURE_CLINICAL,
        }
    }
}

/// The ten banded fields in feature order.
const BANDED_FIELDS: [FieldId; 10] = [
    FieldId::Age,
    FieldId::Bmi,
    FieldId::SnoringRate,
    FieldId::RespirationRate,
    FieldId::BodyTemperature,
    FieldId::LimbMovement,
    FieldId::BloodOxygen,
    FieldId::EyeMovement,
    FieldId::SleepingHours,
    FieldId::HeartRate,
];

/// Descriptor classifier: pure and stateless, no failure modes on validated
/// input. Categories never look across fields.
pub struct Classifier;

impl Classifier {
    /// One reading per banded field, in field order.
    pub fn classify(features: &FeatureVector, config: &ClassifierConfig) -> Vec<CategoryReading> {
        BANDED_FIELDS
            .iter()
            .filter_map(|&field| {
                let value = features.get(field);
                let label = Self::classify_field(field, value, config)?;
                Some(CategoryReading {
                    field,
                    value,
                    severity: severity_for_label(label),
                    label: label.to_string(),
                })
            })
            .collect()
    }

    /// Category label for a single field value. `None` for the two
    /// categorical fields, which carry no bands.
    pub fn classify_field(
        field: FieldId,
        value: f64,
        config: &ClassifierConfig,
    ) -> Option<&'static str> {
        table_for(field, config).map(|table| table.classify(value))
    }
}

fn table_for(field: FieldId, config: &ClassifierConfig) -> Option<&'static BandTable> {
    match field {
        FieldId::Age => Some(&AGE_BANDS),
        FieldId::Bmi => Some(config.bmi),
        FieldId::SnoringRate => Some(&SNORING_RATE_BANDS),
        FieldId::RespirationRate => Some(&RESPIRATION_RATE_BANDS),
        FieldId::BodyTemperature => Some(config.body_temperature),
        FieldId::LimbMovement => Some(&LIMB_MOVEMENT_BANDS),
        FieldId::BloodOxygen => Some(&BLOOD_OXYGEN_BANDS),
        FieldId::EyeMovement => Some(&EYE_MOVEMENT_BANDS),
        FieldId::SleepingHours => Some(&SLEEPING_HOURS_BANDS),
        FieldId::HeartRate => Some(&HEART_RATE_BANDS),
        FieldId::MaritalStatus | FieldId::Gender => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(field: FieldId, value: f64) -> &'static str {
        Classifier::classify_field(field, value, &ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn test_age_bands() {
        let cases = [
            (18.0, "Adolescent"),
            (19.0, "Young adult"),
            (24.0, "Young adult"),
            (25.0, "Adult"),
            (45.0, "Adult"),
            (46.0, "Middle-aged"),
            (64.0, "Middle-aged"),
            (65.0, "Older adult"),
            (80.0, "Older adult"),
        ];
        for (value, expected) in cases {
            assert_eq!(classify_default(FieldId::Age, value), expected, "age {value}");
        }
    }

    #[test]
    fn test_bmi_standard_bands() {
        let cases = [
            (18.4, "Underweight"),
            (18.5, "Normal weight"),
            (24.9, "Normal weight"),
            (25.0, "Overweight"),
            (29.9, "Overweight"),
            (29.95, "Obese"),
            (30.0, "Obese"),
            (30.1, "Extremely obese"),
        ];
        for (value, expected) in cases {
            assert_eq!(classify_default(FieldId::Bmi, value), expected, "bmi {value}");
        }
    }

    #[test]
    fn test_bmi_revised_bands() {
        let cases = [
            (24.9, "Normal weight"),
            (25.0, "Normal weight"),
            (25.1, "Overweight"),
            (30.0, "Overweight"),
            (30.1, "Obese"),
            (35.0, "Obese"),
            (35.1, "Extremely obese"),
        ];
        for (value, expected) in cases {
            assert_eq!(BMI_REVISED.classify(value), expected, "bmi {value}");
        }
    }

    #[test]
    fn test_snoring_bands() {
        let cases = [
            (0.0, "Normal"),
            (5.0, "Normal"),
            (5.5, "Mild"),
            (15.0, "Mild"),
            (16.0, "Moderate"),
            (30.0, "Moderate"),
            (31.0, "Heavy"),
            (45.0, "Heavy"),
            (46.0, "Severe"),
        ];
        for (value, expected) in cases {
            assert_eq!(classify_default(FieldId::SnoringRate, value), expected);
        }
    }

    #[test]
    fn test_respiration_bands() {
        let cases = [
            (8.0, "Hypoventilation"),
            (11.0, "Hypoventilation"),
            (11.5, "Normal"),
            (12.0, "Normal"),
            (20.0, "Normal"),
            (20.1, "Hyperventilation"),
        ];
        for (value, expected) in cases {
            assert_eq!(classify_default(FieldId::RespirationRate, value), expected);
        }
    }

    #[test]
    fn test_body_temperature_clinical_boundaries() {
        let cases = [
            (90.0, "Hypothermia"),
            (96.9, "Hypothermia"),
            (97.0, "Normal"),
            (99.5, "Normal"),
            (99.6, "Hyperthermia"),
        ];
        for (value, expected) in cases {
            assert_eq!(classify_default(FieldId::BodyTemperature, value), expected);
        }
    }

    #[test]
    fn test_body_temperature_legacy_table() {
        let cases = [
            (79.9, "Low"),
            (80.0, "Normal"),
            (90.0, "Normal"),
            (100.0, "Normal"),
            (100.1, "High"),
        ];
        for (value, expected) in cases {
            assert_eq!(BODY_TEMPERATURE_LEGACY.classify(value), expected);
        }
    }

    #[test]
    fn test_limb_movement_bands() {
        let cases = [(5.0, "Normal"), (6.0, "Moderate"), (25.0, "Moderate"), (26.0, "Severe")];
        for (value, expected) in cases {
            assert_eq!(classify_default(FieldId::LimbMovement, value), expected);
        }
    }

    #[test]
    fn test_blood_oxygen_bands() {
        let cases = [
            (60.0, "Cyanosis"),
            (69.0, "Cyanosis"),
            (70.0, "Severe hypoxia"),
            (79.0, "Severe hypoxia"),
            (80.0, "Low"),
            (89.0, "Low"),
            (90.0, "Moderate"),
            (94.0, "Moderate"),
            (95.0, "Normal"),
            (99.0, "Normal"),
        ];
        for (value, expected) in cases {
            assert_eq!(classify_default(FieldId::BloodOxygen, value), expected);
        }
    }

    #[test]
    fn test_eye_movement_bands() {
        assert_eq!(classify_default(FieldId::EyeMovement, 25.0), "Normal");
        assert_eq!(classify_default(FieldId::EyeMovement, 25.5), "High REM");
    }

    #[test]
    fn test_sleeping_hours_bands() {
        let cases = [
            (4.0, "Deprivation"),
            (6.0, "Deprivation"),
            (6.5, "Normal"),
            (7.0, "Normal"),
            (9.0, "Normal"),
            (9.5, "Hypersomnia"),
        ];
        for (value, expected) in cases {
            assert_eq!(classify_default(FieldId::SleepingHours, value), expected);
        }
    }

    #[test]
    fn test_heart_rate_bands() {
        assert_eq!(classify_default(FieldId::HeartRate, 39.0), "Bradycardia");
        assert_eq!(classify_default(FieldId::HeartRate, 40.0), "Normal");
        assert_eq!(classify_default(FieldId::HeartRate, 75.0), "Normal");
        assert_eq!(classify_default(FieldId::HeartRate, 76.0), "Tachycardia");
    }

    #[test]
    fn test_boundary_falls_in_exactly_one_band() {
        // Nudging across each limit changes the label; sitting on it does
        // not straddle.
        let tables: [&BandTable; 8] = [
            &AGE_BANDS,
            &BMI_STANDARD,
            &SNORING_RATE_BANDS,
            &RESPIRATION_RATE_BANDS,
            &BODY_TEMPERATURE_CLINICAL,
            &LIMB_MOVEMENT_BANDS,
            &BLOOD_OXYGEN_BANDS,
            &HEART_RATE_BANDS,
        ];
        for table in tables {
            for band in table.bands {
                let on = table.classify(band.limit);
                let above = table.classify(band.limit + 0.001);
                let below = table.classify(band.limit - 0.001);
                match band.bound {
                    Bound::Inclusive => {
                        assert_eq!(on, band.label, "{} at {}", table.name, band.limit);
                        assert_ne!(above, on, "{} above {}", table.name, band.limit);
                    }
                    Bound::Exclusive => {
                        assert_ne!(on, band.label, "{} at {}", table.name, band.limit);
                        assert_eq!(below, band.label, "{} below {}", table.name, band.limit);
                    }
                }
            }
        }
    }

    #[test]
    fn test_severity_keyword_sets() {
        let critical = ["Underweight", "Hypoventilation", "Bradycardia", "Hypothermia", "Deprivation", "Cyanosis", "Severe hypoxia", "Severe"];
        for label in critical {
            assert_eq!(severity_for_label(label), Severity::Critical, "{label}");
        }
        let warning = ["Overweight", "Obese", "Extremely obese", "Low", "High", "Hyperventilation", "Hypersomnia", "Hyperthermia", "Tachycardia", "Moderate", "Heavy", "High REM"];
        for label in warning {
            assert_eq!(severity_for_label(label), Severity::Warning, "{label}");
        }
        assert_eq!(severity_for_label("Normal"), Severity::Normal);
        assert_eq!(severity_for_label("Normal weight"), Severity::Normal);
        for label in ["Adolescent", "Young adult", "Adult", "Middle-aged", "Older adult", "Mild"] {
            assert_eq!(severity_for_label(label), Severity::Neutral, "{label}");
        }
    }

    #[test]
    fn test_classify_returns_ten_readings_in_field_order() {
        let features = FeatureVector {
            age: 22.0,
            marital_status: 1.0,
            gender: 1.0,
            bmi: 25.0,
            snoring_rate: 0.0,
            respiration_rate: 15.0,
            body_temperature: 90.0,
            limb_movement: 0.0,
            blood_oxygen: 80.0,
            eye_movement: 0.0,
            sleeping_hours: 8.0,
            heart_rate: 70.0,
        };
        let readings = Classifier::classify(&features, &ClassifierConfig::default());
        assert_eq!(readings.len(), 10);
        assert_eq!(readings[0].field, FieldId::Age);
        assert_eq!(readings[0].label, "Young adult");
        assert_eq!(readings[1].label, "Overweight");
        assert_eq!(readings[4].label, "Hypothermia");
        assert_eq!(readings[4].severity, Severity::Critical);
        assert_eq!(readings[6].label, "Low");
        assert_eq!(readings[6].severity, Severity::Warning);
        assert_eq!(readings[9].field, FieldId::HeartRate);
        assert_eq!(readings[9].label, "Normal");
    }

    #[test]
    fn test_config_override_selects_variant_tables() {
        let config = ClassifierConfig {
            bmi: &BMI_REVISED,
            body_temperature: &BODY_TEMPERATURE_LEGACY,
        };
        assert_eq!(
            Classifier::classify_field(FieldId::Bmi, 25.0, &config),
            Some("Normal weight")
        );
        assert_eq!(
            Classifier::classify_field(FieldId::BodyTemperature, 90.0, &config),
            Some("Normal")
        );
    }

    #[test]
    fn test_categorical_fields_have_no_label() {
        let config = ClassifierConfig::default();
        assert_eq!(Classifier::classify_field(FieldId::MaritalStatus, 1.0, &config), None);
        assert_eq!(Classifier::classify_field(FieldId::Gender, 0.0, &config), None);
    }
}
