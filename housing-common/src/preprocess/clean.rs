//! Missing-value handling

use super::frame::{Cell, Frame};
use crate::schema::FeatureSchema;

/// Counts of cells rewritten by [`fill_missing`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub sentinels: usize,
    pub missing: usize,
}

/// Replace the literal sentinel, then every missing or NaN cell, with the fill value
///
/// Only an exact, case-sensitive match of the sentinel is scrubbed.
pub fn fill_missing(frame: &mut Frame, schema: &FeatureSchema) -> CleanStats {
    let mut stats = CleanStats::default();
    for column in frame.columns_mut() {
        for cell in column.cells.iter_mut() {
            match cell {
                Cell::Text(s) if *s == schema.null_sentinel => {
                    *cell = Cell::Number(schema.fill_value);
                    stats.sentinels += 1;
                }
                Cell::Missing => {
                    *cell = Cell::Number(schema.fill_value);
                    stats.missing += 1;
                }
                Cell::Number(v) if v.is_nan() => {
                    *cell = Cell::Number(schema.fill_value);
                    stats.missing += 1;
                }
                _ => {}
            }
        }
    }
    stats
}
