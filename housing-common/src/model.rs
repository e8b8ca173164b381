//! Pre-trained regression model
//!
//! The artifact is a JSON document holding the fitted parameters of a linear
//! model together with the feature names it was trained on:
//!
//! ```json
//! {"feature_names": ["longitude", ...], "coefficients": [...], "intercept": 0.0}
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::preprocess::FeatureMatrix;

/// Model loading and prediction failures
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid model artifact: {0}")]
    Invalid(String),

    #[error("Feature mismatch: model expects {expected:?}, got {got:?}")]
    FeatureMismatch { expected: Vec<String>, got: Vec<String> },

    #[error("IO error reading model: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that predicts one value per feature-matrix row
pub trait Regressor: Send + Sync {
    /// Feature columns the model was trained on, in order
    fn feature_names(&self) -> &[String];

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError>;
}

/// Fitted linear regression parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ModelError> {
        let model = Self {
            feature_names,
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names.len() != self.coefficients.len() {
            return Err(ModelError::Invalid(format!(
                "{} feature names but {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            )));
        }
        Ok(())
    }

    /// Parse an artifact from JSON text
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let model: Self =
            serde_json::from_str(text).map_err(|e| ModelError::Invalid(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Load an artifact from disk
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        info!("Loading model from {}", path.display());
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ModelError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(ModelError::Io(e)),
        };
        let model = Self::from_json(&text)?;
        debug!("Model loaded with {} features", model.feature_names.len());
        Ok(model)
    }
}

impl Regressor for LinearRegressor {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        if features.columns() != self.feature_names.as_slice() {
            return Err(ModelError::FeatureMismatch {
                expected: self.feature_names.clone(),
                got: features.columns().to_vec(),
            });
        }

        Ok(features
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.coefficients)
                    .fold(self.intercept, |acc, (x, w)| acc + x * w)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_feature_model() -> LinearRegressor {
        LinearRegressor::new(vec!["a".to_string(), "b".to_string()], vec![2.0, -1.0], 10.0)
            .unwrap()
    }

    #[test]
    fn test_predict_linear_combination() {
        let model = two_feature_model();
        let matrix = FeatureMatrix::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 1.0], vec![0.0, 4.0]],
        );
        assert_eq!(model.predict(&matrix).unwrap(), vec![11.0, 6.0]);
    }

    #[test]
    fn test_predict_rejects_mismatched_columns() {
        let model = two_feature_model();
        let matrix = FeatureMatrix::new(vec!["b".to_string(), "a".to_string()], vec![]);
        assert!(matches!(
            model.predict(&matrix),
            Err(ModelError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_from_json_length_mismatch() {
        let text = r#"{"feature_names": ["a"], "coefficients": [1.0, 2.0], "intercept": 0.0}"#;
        assert!(matches!(
            LinearRegressor::from_json(text),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LinearRegressor::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
    }

    #[test]
    fn test_load_round_trip_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = two_feature_model();
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();
        assert_eq!(LinearRegressor::load(&path).unwrap(), model);
    }
}
