//! Per-run summary statistics keyed by run label.

use crate::format::format_timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header of the row-label column in metrics files.
pub const METRICS_INDEX_LABEL: &str = "TIMESTEP";

/// Metrics table: rows keyed by run label, ordered columns.
///
/// Rows iterate in label order. Absent cells and `NaN` cells are both
/// treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsTable {
    columns: Vec<String>,
    rows: BTreeMap<String, BTreeMap<String, f64>>,
}

impl MetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row label for a run timestamp.
    pub fn label_for(ts: &NaiveDateTime) -> String {
        format_timestamp(ts)
    }

    /// Declare a column without setting any value.
    pub fn add_column(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// Set one cell, creating the row and column as needed.
    pub fn insert(&mut self, label: impl Into<String>, column: impl Into<String>, value: f64) {
        let column = column.into();
        self.add_column(column.clone());
        self.rows
            .entry(label.into())
            .or_default()
            .insert(column, value);
    }

    /// Set several cells of one row.
    pub fn push_row<I, K>(&mut self, label: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let label = label.into();
        self.rows.entry(label.clone()).or_default();
        for (column, value) in values {
            self.insert(label.clone(), column, value);
        }
    }

    /// Value at (label, column), `None` when absent or `NaN`.
    pub fn get(&self, label: &str, column: &str) -> Option<f64> {
        self.rows
            .get(label)
            .and_then(|row| row.get(column))
            .copied()
            .filter(|v| !v.is_nan())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Values of one row aligned to [`columns`](Self::columns), `NaN` when missing.
    pub fn row_values(&self, label: &str) -> Vec<f64> {
        self.columns
            .iter()
            .map(|c| self.get(label, c).unwrap_or(f64::NAN))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Merge `self` over `prior`.
    ///
    /// The result has the union of rows and columns. Where both tables
    /// hold a value for the same (row, column), `self` wins; missing values
    /// in `self` fall back to `prior`. Prior columns keep their order and
    /// new columns are appended.
    pub fn combine_first(&self, prior: &MetricsTable) -> MetricsTable {
        let mut merged = MetricsTable::new();
        for column in prior.columns.iter().chain(self.columns.iter()) {
            merged.add_column(column.clone());
        }
        for label in prior.rows.keys().chain(self.rows.keys()) {
            if merged.rows.contains_key(label) {
                continue;
            }
            let mut row = BTreeMap::new();
            for column in &merged.columns {
                if let Some(v) = self.get(label, column).or_else(|| prior.get(label, column)) {
                    row.insert(column.clone(), v);
                }
            }
            merged.rows.insert(label.clone(), row);
        }
        merged
    }
}
