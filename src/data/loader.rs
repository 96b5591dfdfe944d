//! CSV ingest into a [`Table`].
//!
//! The whole file is read into memory. Each field is typed on its own:
//! missing-value tokens become [`Cell::Missing`], `true`/`false` become
//! booleans, anything that parses as `f64` becomes a number, and the rest
//! stays text. Column-level typing happens later, in the feature builder.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::data::{
    errors::{DataError, DataResult},
    table::{Cell, Table},
};

/// Field values treated as missing.
pub const MISSING_TOKENS: [&str; 5] = ["", "NA", "nan", "NaN", "."];

/// Load a headed CSV file.
///
/// # Errors
/// [`DataError::Io`] if the file cannot be opened, [`DataError::Csv`] for
/// malformed records.
pub fn load_csv(path: &Path) -> DataResult<Table> {
    let file = File::open(path)
        .map_err(|e| DataError::Io { path: path.to_path_buf(), message: e.to_string() })?;
    let table = read_csv(file)?;
    info!(
        "loaded {} rows x {} columns from {}",
        table.n_rows(),
        table.n_cols(),
        path.display()
    );
    Ok(table)
}

/// Load a CSV file and check that `required` columns are present.
///
/// # Errors
/// As [`load_csv`], plus [`DataError::MissingColumn`] for the first absent
/// required column.
pub fn load_csv_with_columns(path: &Path, required: &[&str]) -> DataResult<Table> {
    let table = load_csv(path)?;
    table.require_columns(required)?;
    Ok(table)
}

/// Parse CSV from any reader. The first record is the header.
pub fn read_csv<R: Read>(reader: R) -> DataResult<Table> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (col, field) in columns.iter_mut().zip(record.iter()) {
            col.push(parse_cell(field));
        }
    }
    debug!("parsed {} header fields", headers.len());
    Table::new(headers.iter().map(str::to_string).zip(columns).collect())
}

/// Type one raw CSV field.
pub fn parse_cell(raw: &str) -> Cell {
    let field = raw.trim();
    if MISSING_TOKENS.contains(&field) {
        return Cell::Missing;
    }
    match field {
        "true" | "True" | "TRUE" => return Cell::Bool(true),
        "false" | "False" | "FALSE" => return Cell::Bool(false),
        _ => {}
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Number(v),
        _ => Cell::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover field typing and in-memory CSV parsing. File-system
    // loading is exercised by the integration tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the typing rules for single fields.
    fn parse_cell_types_fields() {
        assert_eq!(parse_cell("3.5"), Cell::Number(3.5));
        assert_eq!(parse_cell(" 7 "), Cell::Number(7.0));
        assert_eq!(parse_cell("TRUE"), Cell::Bool(true));
        assert_eq!(parse_cell("Northeast"), Cell::Text("Northeast".into()));
        assert_eq!(parse_cell("t"), Cell::Text("t".into()));
        for token in MISSING_TOKENS {
            assert_eq!(parse_cell(token), Cell::Missing);
        }
    }

    #[test]
    // Purpose
    // -------
    // Parse a small CSV with mixed types and missing values.
    //
    // Given
    // -----
    // - Three rows; `age` is missing in row 1.
    //
    // Expect
    // ------
    // - Columns in header order; `age` numeric view [Some(32), None, Some(41.5)].
    fn read_csv_builds_typed_table() {
        // Arrange
        let csv = "patents,region,age,iscustomer\n3,Midwest,32,0\n5,Northeast,NA,1\n0,Midwest,41.5,1\n";

        // Act
        let table = read_csv(csv.as_bytes()).expect("valid csv");

        // Assert
        assert_eq!(table.column_names(), &["patents", "region", "age", "iscustomer"]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(
            table.numeric_column("age").expect("numeric"),
            vec![Some(32.0), None, Some(41.5)]
        );
        assert_eq!(table.levels("region").expect("exists"), vec!["Midwest", "Northeast"]);
    }

    #[test]
    // Purpose
    // -------
    // Ragged records surface as CSV errors.
    fn read_csv_rejects_ragged_records() {
        let csv = "a,b\n1,2\n3\n";
        assert!(matches!(read_csv(csv.as_bytes()), Err(DataError::Csv { .. })));
    }
}
