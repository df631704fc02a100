//! Test-result and metrics file writers.
//!
//! Both files are delimited text with `NaN` for missing cells. Writes are
//! whole-file overwrites.

use crate::error::{IoError, Result};
use qc_common::{
    format_value, parse_timestamp, parse_value, MetricsTable, TestResultRow, TestResults,
    METRICS_INDEX_LABEL, MISSING, TEST_RESULT_COLUMNS,
};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Write the test-results file.
///
/// Sorts `results` by (system name, variable name) and re-indexes them
/// 1..N in place before writing, so the caller sees the persisted order.
pub fn write_test_results(path: &Path, results: &mut TestResults) -> Result<()> {
    results.sort_and_reindex();

    info!(path = %path.display(), rows = results.len(), "Writing test results file");

    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec![""];
    header.extend(TEST_RESULT_COLUMNS);
    writer.write_record(&header)?;

    for (index, row) in results.iter() {
        let cells = row.cells();
        writer.write_record(std::iter::once(index.to_string()).chain(cells))?;
    }
    writer.flush()?;
    Ok(())
}

/// Merge `metrics` into the metrics file at `path` and write the union.
///
/// A missing file starts the merge from empty. A file that exists but
/// cannot be parsed is logged and replaced. Other I/O errors propagate.
/// Returns the merged table as written.
pub fn write_metrics(path: &Path, metrics: &MetricsTable) -> Result<MetricsTable> {
    info!(path = %path.display(), rows = metrics.len(), "Writing metrics file");

    let prior = match read_metrics(path) {
        Ok(prior) => prior,
        Err(e) if e.is_not_found() => {
            debug!(path = %path.display(), "No prior metrics file");
            MetricsTable::new()
        }
        Err(e @ IoError::Io(_)) => return Err(e),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Prior metrics file unreadable, starting from empty"
            );
            MetricsTable::new()
        }
    };

    let merged = metrics.combine_first(&prior);

    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec![METRICS_INDEX_LABEL];
    header.extend(merged.columns().iter().map(String::as_str));
    writer.write_record(&header)?;

    for label in merged.labels() {
        let values = merged.row_values(label);
        writer.write_record(
            std::iter::once(label.to_string()).chain(values.into_iter().map(format_value)),
        )?;
    }
    writer.flush()?;

    debug!(
        rows = merged.len(),
        columns = merged.columns().len(),
        "Metrics file written"
    );
    Ok(merged)
}

/// Read a metrics file written by [`write_metrics`].
pub fn read_metrics(path: &Path) -> Result<MetricsTable> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let header = reader.headers()?.clone();
    let mut fields = header.iter();
    match fields.next() {
        Some(first) if first == METRICS_INDEX_LABEL => {}
        other => {
            return Err(IoError::Malformed(format!(
                "expected '{}' as first column, found {:?}",
                METRICS_INDEX_LABEL,
                other.unwrap_or("")
            )))
        }
    }
    let columns: Vec<String> = fields.map(str::to_string).collect();

    let mut metrics = MetricsTable::new();
    for column in &columns {
        metrics.add_column(column.clone());
    }

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let label = record.get(0).unwrap_or_default().to_string();
        let mut values = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let raw = record.get(i + 1).unwrap_or("");
            let value = parse_value(raw).ok_or_else(|| IoError::InvalidValue {
                row: row + 1,
                column: column.clone(),
                value: raw.to_string(),
            })?;
            values.push((column.clone(), value));
        }
        metrics.push_row(label, values);
    }
    Ok(metrics)
}

/// Read a test-results file written by [`write_test_results`].
pub fn read_test_results(path: &Path) -> Result<TestResults> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let header = reader.headers()?.clone();
    let names: Vec<&str> = header.iter().skip(1).collect();
    if names != TEST_RESULT_COLUMNS {
        return Err(IoError::Malformed(format!(
            "unexpected test results columns: {:?}",
            names
        )));
    }

    let mut results = TestResults::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("");
        let optional = |i: usize| {
            let value = field(i);
            (value != MISSING && !value.is_empty()).then(|| value.to_string())
        };

        let index = field(0)
            .parse::<u64>()
            .map_err(|_| IoError::InvalidValue {
                row: row + 1,
                column: "index".to_string(),
                value: field(0).to_string(),
            })?;
        let timesteps = match optional(6) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| IoError::InvalidValue {
                row: row + 1,
                column: TEST_RESULT_COLUMNS[5].to_string(),
                value: raw.clone(),
            })?),
            None => None,
        };

        let entry = TestResultRow {
            system_name: field(1).to_string(),
            variable_name: field(2).to_string(),
            test_type: optional(3),
            start_time: optional(4).as_deref().and_then(parse_timestamp),
            end_time: optional(5).as_deref().and_then(parse_timestamp),
            timesteps,
            error_flag: optional(7),
        };
        results.push_indexed(index, entry);
    }
    Ok(results)
}
