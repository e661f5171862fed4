//! Model export and reload
//!
//! The exported JSON object has four keys, in this order:
//!
//! ```text
//! {
//!     "intercept": [b_0, ...],
//!     "coef": [[w_00, ...], ...],
//!     "normalisation": { "average": [...], "std": [...] },
//!     "classes": { "<id>": "<label>", ... }
//! }
//! ```
//!
//! Non-finite numbers are written as `null` and read back as NaN.

use crate::core::{Classifier, LearnerError, Result};
use crate::data::ClassMap;
use crate::optimizer::LinearModel;
use crate::utils::scaling::NormalizationStats;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Float that serializes non-finite values as `null`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsonFloat(pub f64);

impl Serialize for JsonFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for JsonFloat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Option::<f64>::deserialize(deserializer)?;
        Ok(JsonFloat(value.unwrap_or(f64::NAN)))
    }
}

fn to_json_floats<I: IntoIterator<Item = f64>>(values: I) -> Vec<JsonFloat> {
    values.into_iter().map(JsonFloat).collect()
}

fn from_json_floats(values: &[JsonFloat]) -> Vec<f64> {
    values.iter().map(|v| v.0).collect()
}

/// Normalisation block of the export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedNormalisation {
    average: Vec<JsonFloat>,
    std: Vec<JsonFloat>,
}

/// Persisted artifact: linear decision functions plus preprocessing state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedModel {
    intercept: Vec<JsonFloat>,
    coef: Vec<Vec<JsonFloat>>,
    normalisation: ExportedNormalisation,
    classes: ClassMap,
}

/// Prediction made from an exported model
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPrediction {
    pub class: usize,
    pub label: String,
    pub decision_value: f64,
}

impl ExportedModel {
    /// Bundle a trained model with its normalisation statistics and class map
    pub fn new(model: &LinearModel, stats: &NormalizationStats, classes: &ClassMap) -> Result<Self> {
        if stats.n_features() != model.n_features() {
            return Err(LearnerError::DimensionMismatch {
                expected: model.n_features(),
                actual: stats.n_features(),
            });
        }
        if classes.len() != model.n_classes() {
            return Err(LearnerError::DimensionMismatch {
                expected: model.n_classes(),
                actual: classes.len(),
            });
        }

        Ok(Self {
            intercept: to_json_floats(model.intercept().iter().copied()),
            coef: model
                .coef()
                .iter()
                .map(|row| to_json_floats(row.iter().copied()))
                .collect(),
            normalisation: ExportedNormalisation {
                average: to_json_floats(stats.average.iter().map(|&v| f64::from(v))),
                std: to_json_floats(stats.std.iter().map(|&v| f64::from(v))),
            },
            classes: classes.clone(),
        })
    }

    /// Intercepts, one per classifier row
    pub fn intercept(&self) -> Vec<f64> {
        from_json_floats(&self.intercept)
    }

    /// Weight rows
    pub fn coef(&self) -> Vec<Vec<f64>> {
        self.coef.iter().map(|row| from_json_floats(row)).collect()
    }

    /// Normalisation statistics, restored to `f32`
    pub fn normalisation(&self) -> NormalizationStats {
        NormalizationStats {
            average: self.normalisation.average.iter().map(|v| v.0 as f32).collect(),
            std: self.normalisation.std.iter().map(|v| v.0 as f32).collect(),
        }
    }

    /// Class id to label mapping
    pub fn classes(&self) -> &ClassMap {
        &self.classes
    }

    /// Number of features the model expects
    pub fn n_features(&self) -> usize {
        self.normalisation.average.len()
    }

    /// Rebuild the linear model
    pub fn to_linear_model(&self) -> Result<LinearModel> {
        LinearModel::from_parts(self.coef(), self.intercept(), self.classes.len())
    }

    /// Normalize a raw feature row and predict its label
    pub fn predict(&self, raw_features: &[f32]) -> Result<ExportedPrediction> {
        if raw_features.len() != self.n_features() {
            return Err(LearnerError::DimensionMismatch {
                expected: self.n_features(),
                actual: raw_features.len(),
            });
        }
        let normalized: Vec<f64> = self
            .normalisation()
            .transform_row(raw_features)
            .into_iter()
            .map(f64::from)
            .collect();
        let prediction = self.to_linear_model()?.predict(&normalized);
        let label = self.classes.get(prediction.class).ok_or_else(|| {
            LearnerError::InvalidParameter(format!(
                "Class {} missing from the class map",
                prediction.class
            ))
        })?;

        Ok(ExportedPrediction {
            class: prediction.class,
            label: label.to_string(),
            decision_value: prediction.decision_value,
        })
    }

    /// Serialize with 4-space indentation
    pub fn to_json_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_json(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| LearnerError::SerializationError(e.to_string()))
    }

    /// Parse an exported model
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Save model to file, replacing any existing content
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(LearnerError::IoError)?;
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer)?;
        writer.flush().map_err(LearnerError::IoError)?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(LearnerError::IoError)?;
        let reader = BufReader::new(file);
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    /// Check that every array agrees on the feature and row counts
    fn validate(&self) -> Result<()> {
        let n_features = self.n_features();
        if self.normalisation.std.len() != n_features {
            return Err(LearnerError::DimensionMismatch {
                expected: n_features,
                actual: self.normalisation.std.len(),
            });
        }
        if let Some(row) = self.coef.iter().find(|row| row.len() != n_features) {
            return Err(LearnerError::DimensionMismatch {
                expected: n_features,
                actual: row.len(),
            });
        }
        if self.intercept.len() != self.coef.len() {
            return Err(LearnerError::DimensionMismatch {
                expected: self.coef.len(),
                actual: self.intercept.len(),
            });
        }
        let expected_rows = if self.classes.len() == 2 { 1 } else { self.classes.len() };
        if self.coef.len() != expected_rows {
            return Err(LearnerError::InvalidParameter(format!(
                "{} coefficient rows do not fit {} classes",
                self.coef.len(),
                self.classes.len()
            )));
        }
        Ok(())
    }

    fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encode;
    use tempfile::NamedTempFile;

    fn fixture() -> ExportedModel {
        let model = LinearModel::from_parts(vec![vec![0.5, -1.0]], vec![0.25], 2).unwrap();
        let stats = NormalizationStats {
            average: vec![1.0, 2.0],
            std: vec![0.5, 4.0],
        };
        let labels: Vec<String> = vec!["B".into(), "A".into()];
        let (_, _, classes) = encode(&labels).unwrap();
        ExportedModel::new(&model, &stats, &classes).unwrap()
    }

    #[test]
    fn test_json_layout() {
        let json = fixture().to_json_string().unwrap();
        let expected = r#"{
    "intercept": [
        0.25
    ],
    "coef": [
        [
            0.5,
            -1.0
        ]
    ],
    "normalisation": {
        "average": [
            1.0,
            2.0
        ],
        "std": [
            0.5,
            4.0
        ]
    },
    "classes": {
        "1": "B",
        "0": "A"
    }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_non_finite_values_become_null() {
        let model = LinearModel::from_parts(vec![vec![f64::NAN]], vec![f64::INFINITY], 2).unwrap();
        let stats = NormalizationStats {
            average: vec![3.0],
            std: vec![0.0],
        };
        let labels: Vec<String> = vec!["x".into(), "y".into()];
        let (_, _, classes) = encode(&labels).unwrap();
        let exported = ExportedModel::new(&model, &stats, &classes).unwrap();

        let json = exported.to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["coef"][0][0].is_null());
        assert!(value["intercept"][0].is_null());
        assert_eq!(value["normalisation"]["std"][0], 0.0);

        let back = ExportedModel::from_json_str(&json).unwrap();
        assert!(back.coef()[0][0].is_nan());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let exported = fixture();
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        exported.save_to_file(temp_file.path())?;

        let loaded = ExportedModel::load_from_file(temp_file.path())?;
        assert_eq!(loaded, exported);
        assert_eq!(loaded.n_features(), 2);
        assert_eq!(loaded.classes().get(1), Some("B"));
        Ok(())
    }

    #[test]
    fn test_predict_from_raw_features() {
        let exported = fixture();
        // Normalized: ((1.5 - 1) / 0.5, (2 - 2) / 4) = (1, 0); decision 0.75
        let prediction = exported.predict(&[1.5, 2.0]).unwrap();
        assert_eq!(prediction.class, 1);
        assert_eq!(prediction.label, "B");
        assert_eq!(prediction.decision_value, 0.75);

        // Normalized: (0, 1); decision -0.75
        let prediction = exported.predict(&[1.0, 6.0]).unwrap();
        assert_eq!(prediction.label, "A");

        assert!(matches!(
            exported.predict(&[1.0]),
            Err(LearnerError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_load_rejects_inconsistent_lengths() {
        let json = r#"{
    "intercept": [0.0],
    "coef": [[1.0, 5.0, 9.0]],
    "normalisation": {"average": [0.0, 0.0], "std": [1.0]},
    "classes": {"0": "a", "1": "b"}
}"#;
        assert!(matches!(
            ExportedModel::from_json_str(json),
            Err(LearnerError::DimensionMismatch { expected: 2, actual: 1 })
        ));

        let json = r#"{
    "intercept": [0.0],
    "coef": [[1.0, 5.0, 9.0]],
    "normalisation": {"average": [0.0, 0.0], "std": [1.0, 1.0]},
    "classes": {"0": "a", "1": "b"}
}"#;
        assert!(matches!(
            ExportedModel::from_json_str(json),
            Err(LearnerError::DimensionMismatch { expected: 2, actual: 3 })
        ));

        let json = r#"{
    "intercept": [0.0, 1.0],
    "coef": [[1.0, 5.0]],
    "normalisation": {"average": [0.0, 0.0], "std": [1.0, 1.0]},
    "classes": {"0": "a", "1": "b"}
}"#;
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), json).unwrap();
        assert!(matches!(
            ExportedModel::load_from_file(temp_file.path()),
            Err(LearnerError::DimensionMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_new_validates_shapes() {
        let model = LinearModel::from_parts(vec![vec![0.5, -1.0]], vec![0.25], 2).unwrap();
        let stats = NormalizationStats {
            average: vec![1.0],
            std: vec![1.0],
        };
        let labels: Vec<String> = vec!["A".into(), "B".into()];
        let (_, _, classes) = encode(&labels).unwrap();
        assert!(matches!(
            ExportedModel::new(&model, &stats, &classes),
            Err(LearnerError::DimensionMismatch { .. })
        ));
    }
}
