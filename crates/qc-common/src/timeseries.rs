//! Timestamp-indexed table of floating-point sensor channels.

use crate::error::{Result, TableError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rows indexed by timestamp, columns are named `f64` channels.
///
/// Missing values are stored as `f64::NAN`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesTable {
    columns: Vec<String>,
    index: Vec<NaiveDateTime>,
    rows: Vec<Vec<f64>>,
}

impl TimeSeriesTable {
    /// Create an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            index: Vec::new(),
            rows: Vec::new(),
        })
    }

    /// A table with no columns and no rows.
    ///
    /// Readers return this to signal failure.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn push_row(&mut self, timestamp: NaiveDateTime, values: Vec<f64>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(TableError::ShapeMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        self.index.push(timestamp);
        self.rows.push(values);
        Ok(())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Timestamp index in row order.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Values of row `i`.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    /// Values of a named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let pos = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[pos]).collect())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// First timestamp.
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.index.first().copied()
    }

    /// Last timestamp.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.index.last().copied()
    }

    /// Stable sort of rows by timestamp.
    pub fn sort_by_index(&mut self) {
        if self.index.windows(2).all(|w| w[0] <= w[1]) {
            return;
        }
        let mut order: Vec<usize> = (0..self.index.len()).collect();
        order.sort_by_key(|&i| self.index[i]);
        self.index = order.iter().map(|&i| self.index[i]).collect();
        self.rows = order.iter().map(|&i| self.rows[i].clone()).collect();
    }

    /// Drop rows whose timestamp equals the previous row's, keeping the first.
    ///
    /// Assumes the index is sorted. Returns the number of rows removed.
    pub fn dedup_index(&mut self) -> usize {
        let before = self.index.len();
        let mut keep = Vec::with_capacity(before);
        for (i, ts) in self.index.iter().enumerate() {
            keep.push(i == 0 || self.index[i - 1] != *ts);
        }
        let mut flags = keep.iter();
        self.rows.retain(|_| *flags.next().unwrap_or(&true));
        let mut flags = keep.iter();
        self.index.retain(|_| *flags.next().unwrap_or(&true));
        before - self.index.len()
    }
}
