//! In-memory tables used by the preprocessing pipeline

use serde_json::{Map, Value};

/// Single scalar cell of an input table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Numeric value of the cell, or `None` for text and missing cells
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Convert a JSON document field into a cell
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Missing,
            Value::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_nan() => Cell::Missing,
                Ok(v) => Cell::Number(v),
                Err(_) => Cell::Text(s.clone()),
            },
            Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
        }
    }
}

/// Named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

/// Column-oriented table with a fixed row count
///
/// Column names are not required to be unique; lookups by name return the
/// first match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    /// Build a frame from columns that all hold `n_rows` cells
    pub fn new(columns: Vec<Column>, n_rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.cells.len() == n_rows));
        Self { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Index of the first column with this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove and return the column at `index`
    pub fn remove(&mut self, index: usize) -> Column {
        self.columns.remove(index)
    }

    /// Append a column; its length must match the frame's row count
    pub fn push(&mut self, column: Column) {
        debug_assert_eq!(column.cells.len(), self.n_rows);
        self.columns.push(column);
    }
}

/// Numeric feature table with a fixed, ordered column set
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Build a matrix from row-major values; every row must have one value per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    /// One JSON object per row, keyed by column name
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(name, value)| (name.clone(), Value::from(*value)))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_from_json() {
        assert_eq!(Cell::from_json(&json!(1.5)), Cell::Number(1.5));
        assert_eq!(Cell::from_json(&json!("2")), Cell::Number(2.0));
        assert_eq!(Cell::from_json(&json!(null)), Cell::Missing);
        assert_eq!(Cell::from_json(&json!(true)), Cell::Number(1.0));
        assert_eq!(Cell::from_json(&json!("Nan")), Cell::Missing);
        assert_eq!(
            Cell::from_json(&json!("INLAND")),
            Cell::Text("INLAND".to_string())
        );
    }

    #[test]
    fn test_frame_lookup_returns_first_duplicate() {
        let frame = Frame::new(
            vec![
                Column::new("a", vec![Cell::Number(1.0)]),
                Column::new("a", vec![Cell::Number(2.0)]),
            ],
            1,
        );
        assert_eq!(frame.position("a"), Some(0));
        assert_eq!(frame.shape(), (1, 2));
    }

    #[test]
    fn test_feature_matrix_records() {
        let matrix = FeatureMatrix::new(
            vec!["x".to_string(), "y".to_string()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        );
        let records = matrix.to_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["x"], json!(3.0));
        assert_eq!(matrix.column("y"), Some(vec![2.0, 4.0]));
        assert_eq!(matrix.column("z"), None);
    }
}
