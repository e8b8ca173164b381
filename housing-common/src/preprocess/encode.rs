//! One-hot expansion of the categorical column

use std::collections::BTreeSet;

use super::frame::{Cell, Column, Frame};
use crate::schema::FeatureSchema;

/// Category label of a cell; missing cells have none
fn category_label(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(s) => Some(s.clone()),
        Cell::Number(v) => Some(v.to_string()),
        Cell::Missing => None,
    }
}

/// Replace the schema's categorical column with indicator columns
///
/// One 0/1 column per distinct indicator name, in sorted order, with no
/// baseline category dropped. Raw labels that sanitize to the same name
/// (`NEAR BAY` and `NEAR_BAY`) share one column. Rows with a missing
/// category get all zeros. Returns the names of the added columns, or `None`
/// when the categorical column is absent.
pub fn encode_categorical(frame: &mut Frame, schema: &FeatureSchema) -> Option<Vec<String>> {
    let index = frame.position(&schema.categorical_column)?;
    let source = frame.remove(index);

    let names: Vec<Option<String>> = source
        .cells
        .iter()
        .map(|cell| category_label(cell).map(|label| schema.indicator_name(&label)))
        .collect();
    let distinct: BTreeSet<&str> = names.iter().flatten().map(String::as_str).collect();

    let mut added = Vec::with_capacity(distinct.len());
    for name in distinct {
        let cells = names
            .iter()
            .map(|row| {
                let hit = row.as_deref() == Some(name);
                Cell::Number(if hit { 1.0 } else { 0.0 })
            })
            .collect();
        frame.push(Column::new(name, cells));
        added.push(name.to_string());
    }

    Some(added)
}
