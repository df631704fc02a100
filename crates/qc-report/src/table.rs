//! HTML table fragments for tabular data.

use crate::config::RenderConfig;
use crate::html::html_escape;
use qc_common::{format_value, format_value_with_precision, MetricsTable, TestResults, TEST_RESULT_COLUMNS};

/// Labelled rows of text cells rendered as `<table class="dataframe">`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlTable {
    columns: Vec<String>,
    rows: Vec<(String, Vec<String>)>,
    show_header: bool,
}

impl HtmlTable {
    /// Create an empty table with a header row.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            show_header: true,
        }
    }

    /// Hide the header row.
    pub fn without_header(mut self) -> Self {
        self.show_header = false;
        self
    }

    /// Append a row with its index label.
    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<String>) {
        self.rows.push((label.into(), cells));
    }

    /// Test results in their current order, index labels included.
    pub fn from_test_results(results: &TestResults) -> Self {
        let mut table = Self::new(TEST_RESULT_COLUMNS);
        for (index, row) in results.iter() {
            table.push_row(index.to_string(), row.cells().to_vec());
        }
        table
    }

    /// Metrics table, one row per run label.
    pub fn from_metrics(metrics: &MetricsTable, config: &RenderConfig) -> Self {
        let mut table = Self::new(metrics.columns().iter().cloned());
        for label in metrics.labels() {
            let cells = metrics
                .row_values(label)
                .into_iter()
                .map(|v| format_float(v, config))
                .collect();
            table.push_row(label, cells);
        }
        table
    }

    /// Free-text lines numbered from 1, without a header.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut table = Self::new([String::new()]).without_header();
        for (i, line) in lines.iter().enumerate() {
            table.push_row((i + 1).to_string(), vec![line.as_ref().to_string()]);
        }
        table
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render to an HTML fragment.
    pub fn render(&self, config: &RenderConfig) -> String {
        let cell = |text: &str| html_escape(&truncate(text, config.max_col_width));

        let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n");
        if self.show_header {
            html.push_str(&format!(
                "  <thead>\n    <tr style=\"text-align: {};\">\n      <th></th>\n",
                config.justify.css()
            ));
            for column in &self.columns {
                html.push_str(&format!("      <th>{}</th>\n", cell(column)));
            }
            html.push_str("    </tr>\n  </thead>\n");
        }
        html.push_str("  <tbody>\n");
        for (label, cells) in &self.rows {
            html.push_str(&format!("    <tr>\n      <th>{}</th>\n", cell(label)));
            for value in cells {
                html.push_str(&format!("      <td>{}</td>\n", cell(value)));
            }
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n</table>");
        html
    }
}

/// Format a float according to the render config.
pub(crate) fn format_float(value: f64, config: &RenderConfig) -> String {
    match config.float_precision {
        Some(precision) => format_value_with_precision(value, precision),
        None => format_value(value),
    }
}

/// Shorten text to `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if text.chars().count() > max => {
            let keep = max.saturating_sub(3);
            let mut out: String = text.chars().take(keep).collect();
            out.push_str("...");
            out
        }
        _ => text.to_string(),
    }
}
