//! CSV loading into a [`Frame`]

use std::io::Read;

use csv::{ErrorKind, ReaderBuilder};

use super::frame::{Cell, Column, Frame};
use super::PreprocessError;

/// Cell values loaded as missing
///
/// `Null` is deliberately absent; the cleaning step scrubs it as a sentinel.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parse one raw CSV field
pub fn parse_cell(raw: &str) -> Cell {
    if NA_TOKENS.contains(&raw) {
        return Cell::Missing;
    }
    match raw.trim().parse::<f64>() {
        // Any NaN spelling (`NAN`, `+nan`) is missing
        Ok(v) if v.is_nan() => Cell::Missing,
        Ok(v) => Cell::Number(v),
        Err(_) => Cell::Text(raw.to_string()),
    }
}

/// Read a headed CSV stream into a frame
///
/// Rows shorter than the header are padded with missing cells; longer rows
/// are a format error.
pub fn read_frame<R: Read>(reader: R) -> Result<Frame, PreprocessError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(classify_csv_error)?.clone();
    if headers.is_empty() {
        return Err(PreprocessError::Format(
            "No columns to parse from input".to_string(),
        ));
    }

    let width = headers.len();
    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); width];
    let mut n_rows = 0;

    for result in rdr.records() {
        let record = result.map_err(classify_csv_error)?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(PreprocessError::Format(format!(
                "Error tokenizing data. Expected {} fields in line {}, saw {}",
                width,
                line,
                record.len()
            )));
        }
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(record.get(i).map(parse_cell).unwrap_or(Cell::Missing));
        }
        n_rows += 1;
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();

    Ok(Frame::new(columns, n_rows))
}

/// I/O failures pass through untouched; everything else is a format error
fn classify_csv_error(err: csv::Error) -> PreprocessError {
    let message = err.to_string();
    match err.into_kind() {
        ErrorKind::Io(io) => PreprocessError::Io(io),
        _ => PreprocessError::Format(message),
    }
}
