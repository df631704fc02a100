//! Shared table types for qc-monitor.
//!
//! This crate provides the data structures passed between the reader,
//! writers, and renderers:
//! - [`TimeSeriesTable`]: timestamp-indexed sensor channels
//! - [`TestResults`]: quality-control test outcomes
//! - [`MetricsTable`]: per-run summary statistics keyed by run label
//! - Value and timestamp formatting shared by CSV and HTML output

pub mod error;
pub mod format;
pub mod metrics;
pub mod test_results;
pub mod timeseries;

pub use error::{Result, TableError};
pub use format::{
    format_timestamp, format_value, format_value_with_precision, parse_timestamp, parse_value,
    MISSING,
};
pub use metrics::{MetricsTable, METRICS_INDEX_LABEL};
pub use test_results::{TestResultRow, TestResults, TEST_RESULT_COLUMNS};
pub use timeseries::TimeSeriesTable;
