//! Housing data preprocessing pipeline
//!
//! Turns a raw CSV source into a feature matrix aligned to the model's
//! expected feature vector plus the target vector:
//!
//! 1. Load the CSV (`loader`)
//! 2. Require at least two columns
//! 3. Lower-case and rename columns (`normalize`)
//! 4. Expand the categorical column into indicators (`encode`)
//! 5. Scrub the `Null` sentinel and fill missing cells (`clean`)
//! 6. Split off the target and align the rest (`align`)
//!
//! The pipeline is a pure function of the source and a [`FeatureSchema`].

pub mod align;
pub mod clean;
pub mod encode;
pub mod frame;
pub mod loader;
pub mod normalize;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::schema::FeatureSchema;

pub use align::{align_features, align_records, split_target};
pub use frame::{Cell, Column, FeatureMatrix, Frame};
pub use loader::read_frame;

/// Minimum number of columns a source must carry
pub const MIN_COLUMNS: usize = 2;

/// Preprocessing failures
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// Input source does not exist
    #[error("Input file not found at path: {}", .0.display())]
    NotFound(PathBuf),

    /// Source exists but is not usable tabular data
    #[error("Invalid file format: {0}")]
    Format(String),

    /// Required column missing after transformation
    #[error("{0}")]
    Validation(String),

    /// Any other I/O failure, unchanged
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Schema-bound preprocessing pipeline
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    schema: FeatureSchema,
}

impl Preprocessor {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Preprocess a CSV file on disk
    pub fn preprocess_path(&self, path: &Path) -> Result<(FeatureMatrix, Vec<f64>), PreprocessError> {
        info!("Starting preprocessing for file: {}", path.display());

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                error!("Input file not found at path: {}", path.display());
                return Err(PreprocessError::NotFound(path.to_path_buf()));
            }
            Err(e) => {
                error!("Error loading file '{}': {}", path.display(), e);
                return Err(PreprocessError::Io(e));
            }
        };

        self.preprocess_reader(BufReader::new(file))
    }

    /// Preprocess any CSV stream
    pub fn preprocess_reader<R: Read>(&self, reader: R) -> Result<(FeatureMatrix, Vec<f64>), PreprocessError> {
        let frame = match read_frame(reader) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to load input: {}", e);
                return Err(e);
            }
        };
        info!("Input loaded successfully. Data shape: {:?}", frame.shape());

        self.run(frame)
    }

    /// Run every step after loading
    pub fn run(&self, mut frame: Frame) -> Result<(FeatureMatrix, Vec<f64>), PreprocessError> {
        let schema = &self.schema;

        if frame.n_cols() < MIN_COLUMNS {
            error!("Insufficient columns in input: {}", frame.n_cols());
            return Err(PreprocessError::Format(format!(
                "Insufficient columns: expected at least {}, found {}",
                MIN_COLUMNS,
                frame.n_cols()
            )));
        }

        normalize::lowercase_columns(&mut frame);
        debug!("Normalized column names: {:?}", frame.column_names());

        let renamed = normalize::rename_aliases(&mut frame, schema);
        debug!("Renamed {} column(s): {:?}", renamed, frame.column_names());

        match encode::encode_categorical(&mut frame, schema) {
            Some(added) => debug!(
                "Encoded '{}' into {:?}. Current columns: {:?}",
                schema.categorical_column,
                added,
                frame.column_names()
            ),
            None => warn!(
                "'{}' column not found. Skipping encoding.",
                schema.categorical_column
            ),
        }

        let stats = clean::fill_missing(&mut frame, schema);
        debug!(
            "Handled missing and unexpected values (replaced {} '{}', filled {} missing).",
            stats.sentinels, schema.null_sentinel, stats.missing
        );

        let target = match split_target(&mut frame, schema) {
            Ok(target) => target,
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        };
        info!(
            "Separated target column '{}'. Features shape: {:?}, Target length: {}",
            schema.target_column,
            frame.shape(),
            target.len()
        );

        let features = align_features(&frame, schema);
        info!(
            "Aligned features with the expected schema. Final shape: {:?}",
            features.shape()
        );

        info!("Data preprocessing completed successfully.");
        Ok((features, target))
    }
}

/// Preprocess a CSV file with the given schema
pub fn preprocess_path(
    path: &Path,
    schema: &FeatureSchema,
) -> Result<(FeatureMatrix, Vec<f64>), PreprocessError> {
    Preprocessor::new(schema.clone()).preprocess_path(path)
}

/// Preprocess a CSV stream with the given schema
pub fn preprocess_reader<R: Read>(
    reader: R,
    schema: &FeatureSchema,
) -> Result<(FeatureMatrix, Vec<f64>), PreprocessError> {
    Preprocessor::new(schema.clone()).preprocess_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_is_format_error() {
        let err = preprocess_reader("INVALID FILE CONTENT".as_bytes(), &FeatureSchema::housing())
            .unwrap_err();
        assert!(matches!(err, PreprocessError::Format(_)));
    }

    #[test]
    fn test_target_is_not_a_feature() {
        let data = "longitude,median_house_value\n-122.23,452600\n";
        let (features, target) =
            preprocess_reader(data.as_bytes(), &FeatureSchema::housing()).unwrap();
        assert_eq!(target, vec![452600.0]);
        assert!(features.column("median_house_value").is_none());
    }

    #[test]
    fn test_validation_message_names_column() {
        let data = "longitude,latitude\n-122.23,37.88\n";
        let err = preprocess_reader(data.as_bytes(), &FeatureSchema::housing()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Target column 'median_house_value' not found in the dataset."
        );
    }
}
