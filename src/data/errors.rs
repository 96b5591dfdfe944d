//! data::errors — error surface for loading tables and building features.
use std::path::PathBuf;

pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    // ---- Input ----
    /// File could not be opened or read.
    Io { path: PathBuf, message: String },

    /// CSV reader failure (malformed record, bad header, ...).
    Csv { message: String },

    // ---- Schema ----
    /// A required column is absent.
    MissingColumn { column: String },

    /// The same column name appears twice.
    DuplicateColumn { column: String },

    /// Columns of a table must share one length.
    LengthMismatch { column: String, expected: usize, found: usize },

    // ---- Values ----
    /// A cell cannot be read as the requested type.
    TypeCast { column: String, row: usize, value: String },

    /// An explicitly requested categorical level never occurs.
    UnknownLevel { column: String, level: String },

    /// No rows left after dropping missing values.
    EmptyTable { rows_dropped: usize },

    /// Assembled design matrix was rejected.
    Design { message: String },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Io { path, message } => {
                write!(f, "Failed to read '{}': {message}", path.display())
            }
            DataError::Csv { message } => write!(f, "CSV error: {message}"),
            DataError::MissingColumn { column } => write!(f, "Missing required column '{column}'"),
            DataError::DuplicateColumn { column } => write!(f, "Duplicate column '{column}'"),
            DataError::LengthMismatch { column, expected, found } => {
                write!(f, "Column '{column}' has {found} rows, expected {expected}")
            }
            DataError::TypeCast { column, row, value } => {
                write!(f, "Cannot read '{value}' in column '{column}' (row {row}) as a number")
            }
            DataError::UnknownLevel { column, level } => {
                write!(f, "Level '{level}' does not occur in column '{column}'")
            }
            DataError::EmptyTable { rows_dropped } => {
                write!(f, "No rows left after dropping {rows_dropped} rows with missing values")
            }
            DataError::Design { message } => write!(f, "Invalid design matrix: {message}"),
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Csv { message: err.to_string() }
    }
}
