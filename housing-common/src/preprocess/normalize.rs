//! Column name normalization

use super::frame::Frame;
use crate::schema::FeatureSchema;

/// Lower-case every column name
pub fn lowercase_columns(frame: &mut Frame) {
    for column in frame.columns_mut() {
        column.name = column.name.to_lowercase();
    }
}

/// Apply the schema's exact-match alias table
///
/// Returns the number of renamed columns.
pub fn rename_aliases(frame: &mut Frame, schema: &FeatureSchema) -> usize {
    let mut renamed = 0;
    for column in frame.columns_mut() {
        let canonical = schema.canonical_name(&column.name);
        if canonical != column.name {
            column.name = canonical.to_string();
            renamed += 1;
        }
    }
    renamed
}
