//! Error types for table construction.

use thiserror::Error;

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors raised while building tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// A row had a different number of values than the table has columns.
    #[error("row has {actual} values, table has {expected} columns")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A column name appeared twice.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
}
