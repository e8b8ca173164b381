//! # Housing Common Library
//!
//! Shared code for the housing data service:
//! - Static feature schema
//! - Preprocessing pipeline (CSV -> aligned feature matrix + target)
//! - Pre-trained regression model
//! - Document and prediction stores
//! - Configuration loading

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod model;
pub mod preprocess;
pub mod schema;
pub mod time;

pub use error::{Error, Result};
pub use model::{LinearRegressor, ModelError, Regressor};
pub use preprocess::{preprocess_path, preprocess_reader, FeatureMatrix, PreprocessError, Preprocessor};
pub use schema::FeatureSchema;
