//! Quality-control test outcomes.

use crate::format::{format_timestamp, MISSING};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Column headers, in output order.
pub const TEST_RESULT_COLUMNS: [&str; 7] = [
    "System Name",
    "Variable Name",
    "Test Type",
    "Start Date",
    "End Date",
    "Timesteps",
    "Error Flag",
];

/// One failed test window for one variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResultRow {
    /// System the variable belongs to.
    pub system_name: String,
    /// Variable (channel) name.
    pub variable_name: String,
    /// Kind of test that failed (range, increment, timestamp, ...).
    pub test_type: Option<String>,
    /// Start of the failure window.
    pub start_time: Option<NaiveDateTime>,
    /// End of the failure window.
    pub end_time: Option<NaiveDateTime>,
    /// Number of timesteps in the window.
    pub timesteps: Option<u64>,
    /// Descriptive text.
    pub error_flag: Option<String>,
}

impl TestResultRow {
    /// Create a row for a system/variable pair.
    pub fn new(system_name: impl Into<String>, variable_name: impl Into<String>) -> Self {
        Self {
            system_name: system_name.into(),
            variable_name: variable_name.into(),
            ..Default::default()
        }
    }

    /// Set the test type.
    pub fn with_test_type(mut self, test_type: impl Into<String>) -> Self {
        self.test_type = Some(test_type.into());
        self
    }

    /// Set the failure window and its timestep count.
    pub fn with_window(mut self, start: NaiveDateTime, end: NaiveDateTime, timesteps: u64) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self.timesteps = Some(timesteps);
        self
    }

    /// Set the descriptive text.
    pub fn with_error_flag(mut self, flag: impl Into<String>) -> Self {
        self.error_flag = Some(flag.into());
        self
    }

    /// Cell text for each of [`TEST_RESULT_COLUMNS`], missing cells as `NaN`.
    pub fn cells(&self) -> [String; 7] {
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());
        let time = |v: &Option<NaiveDateTime>| {
            v.as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| MISSING.to_string())
        };
        [
            self.system_name.clone(),
            self.variable_name.clone(),
            opt(&self.test_type),
            time(&self.start_time),
            time(&self.end_time),
            self.timesteps
                .map(|n| n.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            opt(&self.error_flag),
        ]
    }
}

/// Ordered collection of test results with an explicit row index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResults {
    rows: Vec<TestResultRow>,
    index: Vec<u64>,
}

impl TestResults {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row; its index is its 0-based insertion position.
    pub fn push(&mut self, row: TestResultRow) {
        self.index.push(self.rows.len() as u64);
        self.rows.push(row);
    }

    /// Append a row with an explicit index label (used when reading files back).
    pub fn push_indexed(&mut self, index: u64, row: TestResultRow) {
        self.index.push(index);
        self.rows.push(row);
    }

    /// Sort by (system name, variable name) and re-index densely from 1.
    ///
    /// The sort is stable, so rows for the same variable keep their order.
    pub fn sort_and_reindex(&mut self) {
        self.rows.sort_by(|a, b| {
            a.system_name
                .cmp(&b.system_name)
                .then_with(|| a.variable_name.cmp(&b.variable_name))
        });
        self.index = (1..=self.rows.len() as u64).collect();
    }

    /// Sorted, re-indexed copy.
    pub fn sorted(&self) -> Self {
        let mut copy = self.clone();
        copy.sort_and_reindex();
        copy
    }

    /// Rows in order.
    pub fn rows(&self) -> &[TestResultRow] {
        &self.rows
    }

    /// Index labels in row order.
    pub fn index(&self) -> &[u64] {
        &self.index
    }

    /// `(index, row)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &TestResultRow)> {
        self.index.iter().copied().zip(self.rows.iter())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<TestResultRow> for TestResults {
    fn from_iter<I: IntoIterator<Item = TestResultRow>>(iter: I) -> Self {
        let mut results = TestResults::new();
        for row in iter {
            results.push(row);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::parse_timestamp;

    #[test]
    fn test_sort_and_reindex_orders_by_system_then_variable() {
        let mut results: TestResults = vec![
            TestResultRow::new("B", "Power"),
            TestResultRow::new("A", "Wind").with_error_flag("second"),
            TestResultRow::new("A", "Temp"),
            TestResultRow::new("A", "Wind").with_error_flag("third"),
        ]
        .into_iter()
        .collect();

        assert_eq!(results.index(), &[0, 1, 2, 3]);
        results.sort_and_reindex();

        let keys: Vec<_> = results
            .rows()
            .iter()
            .map(|r| (r.system_name.as_str(), r.variable_name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("A", "Temp"), ("A", "Wind"), ("A", "Wind"), ("B", "Power")]
        );
        assert_eq!(results.index(), &[1, 2, 3, 4]);
        assert_eq!(results.rows()[1].error_flag.as_deref(), Some("second"));
        assert_eq!(results.rows()[2].error_flag.as_deref(), Some("third"));
    }

    #[test]
    fn test_cells_render_missing_as_nan() {
        let row = TestResultRow::new("Sys", "Var");
        let cells = row.cells();
        assert_eq!(cells[0], "Sys");
        assert_eq!(cells[1], "Var");
        assert!(cells[2..].iter().all(|c| c == "NaN"));
    }

    #[test]
    fn test_cells_with_window() {
        let start = parse_timestamp("2015-01-01 00:00:00").unwrap();
        let end = parse_timestamp("2015-01-01 00:15:00").unwrap();
        let row = TestResultRow::new("Sys", "Var")
            .with_test_type("range")
            .with_window(start, end, 4)
            .with_error_flag("Data > upper bound, 10");
        let cells = row.cells();
        assert_eq!(cells[2], "range");
        assert_eq!(cells[3], "2015-01-01 00:00:00");
        assert_eq!(cells[4], "2015-01-01 00:15:00");
        assert_eq!(cells[5], "4");
        assert_eq!(cells[6], "Data > upper bound, 10");
    }

    #[test]
    fn test_sorted_leaves_original_untouched() {
        let results: TestResults = vec![TestResultRow::new("B", "x"), TestResultRow::new("A", "y")]
            .into_iter()
            .collect();
        let sorted = results.sorted();
        assert_eq!(results.rows()[0].system_name, "B");
        assert_eq!(sorted.rows()[0].system_name, "A");
        assert_eq!(sorted.index(), &[1, 2]);
    }
}
