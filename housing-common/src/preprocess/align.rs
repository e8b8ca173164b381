//! Target extraction and alignment to the expected feature vector

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::frame::{Cell, Frame, FeatureMatrix};
use super::PreprocessError;
use crate::schema::FeatureSchema;

/// Numeric value of a cleaned cell; leftover text falls back to the fill value
fn coerce(cell: &Cell, fill: f64, coerced: &mut usize) -> f64 {
    match cell {
        Cell::Number(v) => *v,
        Cell::Text(_) => {
            *coerced += 1;
            fill
        }
        Cell::Missing => fill,
    }
}

/// Remove the target column from the frame and return its values
///
/// Fails with a validation error when the target column is absent.
pub fn split_target(frame: &mut Frame, schema: &FeatureSchema) -> Result<Vec<f64>, PreprocessError> {
    let index = frame.position(&schema.target_column).ok_or_else(|| {
        PreprocessError::Validation(format!(
            "Target column '{}' not found in the dataset.",
            schema.target_column
        ))
    })?;

    let column = frame.remove(index);
    let mut coerced = 0;
    let target = column
        .cells
        .iter()
        .map(|cell| coerce(cell, schema.fill_value, &mut coerced))
        .collect();

    if coerced > 0 {
        warn!(
            "{} non-numeric value(s) in target column '{}' replaced with {}",
            coerced, schema.target_column, schema.fill_value
        );
    }

    Ok(target)
}

/// Reindex candidate columns to exactly the expected feature vector
///
/// Absent features are added filled with the fill value; columns outside the
/// expected vector are dropped.
pub fn align_features(frame: &Frame, schema: &FeatureSchema) -> FeatureMatrix {
    let n_rows = frame.n_rows();
    let mut rows = vec![Vec::with_capacity(schema.expected_features.len()); n_rows];
    let mut coerced = 0;

    for name in &schema.expected_features {
        match frame.column(name) {
            Some(column) => {
                for (row, cell) in rows.iter_mut().zip(&column.cells) {
                    row.push(coerce(cell, schema.fill_value, &mut coerced));
                }
            }
            None => {
                debug!(
                    "Added missing column '{}' with default value {}.",
                    name, schema.fill_value
                );
                for row in rows.iter_mut() {
                    row.push(schema.fill_value);
                }
            }
        }
    }

    let dropped: Vec<&str> = frame
        .column_names()
        .into_iter()
        .filter(|name| schema.feature_index(name).is_none())
        .collect();
    if !dropped.is_empty() {
        debug!("Dropped columns outside the expected schema: {:?}", dropped);
    }
    if coerced > 0 {
        warn!(
            "{} non-numeric feature value(s) replaced with {}",
            coerced, schema.fill_value
        );
    }

    FeatureMatrix::new(schema.expected_features.clone(), rows)
}

/// Align stored JSON documents to the expected feature vector
///
/// Same policy as [`align_features`]: absent or non-numeric fields become the
/// fill value and unknown fields (including `_id`) are ignored.
pub fn align_records(records: &[Map<String, Value>], schema: &FeatureSchema) -> FeatureMatrix {
    let mut coerced = 0;
    let rows = records
        .iter()
        .map(|record| {
            schema
                .expected_features
                .iter()
                .map(|name| {
                    record
                        .get(name)
                        .map(|value| coerce(&Cell::from_json(value), schema.fill_value, &mut coerced))
                        .unwrap_or(schema.fill_value)
                })
                .collect()
        })
        .collect();

    if coerced > 0 {
        warn!(
            "{} non-numeric stored value(s) replaced with {}",
            coerced, schema.fill_value
        );
    }

    FeatureMatrix::new(schema.expected_features.clone(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::frame::Column;
    use serde_json::json;

    #[test]
    fn test_split_target_missing_is_validation_error() {
        let schema = FeatureSchema::housing();
        let mut frame = Frame::new(vec![Column::new("longitude", vec![Cell::Number(1.0)])], 1);
        let err = split_target(&mut frame, &schema).unwrap_err();
        match err {
            PreprocessError::Validation(msg) => assert!(msg.contains("median_house_value")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_align_orders_and_fills() {
        let schema = FeatureSchema::housing();
        let frame = Frame::new(
            vec![
                Column::new("extra", vec![Cell::Number(9.0)]),
                Column::new("latitude", vec![Cell::Number(37.88)]),
                Column::new("longitude", vec![Cell::Number(-122.23)]),
            ],
            1,
        );

        let matrix = align_features(&frame, &schema);
        assert_eq!(matrix.columns(), schema.expected_features.as_slice());
        assert_eq!(matrix.rows()[0][0], -122.23);
        assert_eq!(matrix.rows()[0][1], 37.88);
        assert!(matrix.rows()[0][2..].iter().all(|v| *v == 0.0));
        assert!(matrix.column("extra").is_none());
    }

    #[test]
    fn test_align_records_ignores_unknown_fields() {
        let schema = FeatureSchema::housing();
        let record = json!({"_id": "abc", "longitude": -120.0, "median_income": "3.5", "target": 1.0});
        let records = vec![record.as_object().unwrap().clone()];

        let matrix = align_records(&records, &schema);
        assert_eq!(matrix.shape(), (1, 13));
        assert_eq!(matrix.column("longitude"), Some(vec![-120.0]));
        assert_eq!(matrix.column("median_income"), Some(vec![3.5]));
        assert_eq!(matrix.column("households"), Some(vec![0.0]));
    }
}
