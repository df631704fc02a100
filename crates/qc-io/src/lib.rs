//! File input/output for qc-monitor.
//!
//! - [`reader`]: Campbell Scientific (TOA5) CSV files into a
//!   [`TimeSeriesTable`](qc_common::TimeSeriesTable)
//! - [`writer`]: test-result and metrics files, plus read-back helpers
//!
//! # Example
//!
//! ```no_run
//! use qc_common::{MetricsTable, TestResults};
//! use qc_io::{read_campbell_scientific, write_metrics, write_test_results};
//! use std::path::Path;
//!
//! let data = read_campbell_scientific(Path::new("station.dat"), "TIMESTAMP", None);
//! if data.is_empty() {
//!     // reader failures are logged and surface as an empty table
//! }
//!
//! let mut results = TestResults::new();
//! write_test_results(Path::new("test_results.csv"), &mut results).unwrap();
//!
//! let mut metrics = MetricsTable::new();
//! metrics.insert("2015-01-01 00:00:00", "Completeness", 0.98);
//! write_metrics(Path::new("metrics.csv"), &metrics).unwrap();
//! ```

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{IoError, Result};
pub use reader::{
    parse_campbell_scientific, read_campbell_scientific, try_read_campbell_scientific,
    DEFAULT_INDEX_COLUMN,
};
pub use writer::{read_metrics, read_test_results, write_metrics, write_test_results};
