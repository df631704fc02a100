//! Error types for file input/output.

use thiserror::Error;

/// Result type alias for I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;

/// Errors that can occur while reading or writing qc-monitor files.
#[derive(Error, Debug)]
pub enum IoError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Encoding label not recognized
    #[error("unsupported encoding: {0}")]
    UnknownEncoding(String),

    /// Bytes were not valid in the requested encoding
    #[error("file is not valid {encoding}")]
    Decode { encoding: String },

    /// File ended before the header row
    #[error("missing header row")]
    MissingHeader,

    /// Index column absent from the header
    #[error("index column '{0}' not found")]
    MissingIndexColumn(String),

    /// A data row had more fields than the header
    #[error("row {row} has {actual} fields, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A cell could not be coerced to a float
    #[error("row {row}, column '{column}': '{value}' is not numeric")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// File structure does not match the expected layout
    #[error("malformed file: {0}")]
    Malformed(String),

    /// Table construction error
    #[error("table error: {0}")]
    Table(#[from] qc_common::TableError),
}

impl IoError {
    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IoError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
