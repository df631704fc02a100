//! File-level tests for the reader and writers.
//!
//! Exercises real files on disk:
//! - Reader row counts, float columns, index ordering
//! - Reader failure modes surface as an empty table
//! - Test-results ordering and dense 1-based index after read-back
//! - Metrics merge across two writes: union of columns, newest value wins

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use qc_common::{MetricsTable, TestResultRow, TestResults};
use qc_io::{
    read_campbell_scientific, read_metrics, read_test_results, try_read_campbell_scientific,
    write_metrics, write_test_results, DEFAULT_INDEX_COLUMN,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Build TOA5 text with one data row per value, 15 minutes apart.
fn toa5_text(values: &[f64]) -> String {
    let mut text = String::from(
        "\"TOA5\",\"Station\",\"CR1000\",\"1\",\"OS\",\"prog\",\"2\",\"Table1\"\n\
         \"TIMESTAMP\",\"RECORD\",\"Value\"\n\
         \"TS\",\"RN\",\"m/s\"\n\
         \"\",\"\",\"Avg\"\n",
    );
    for (i, v) in values.iter().enumerate() {
        let ts = base_time() + Duration::minutes(15 * i as i64);
        text.push_str(&format!(
            "\"{}\",{},{}\n",
            ts.format("%Y-%m-%d %H:%M:%S"),
            i,
            v
        ));
    }
    text
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Reader
// ============================================================================

proptest! {
    #[test]
    fn reader_returns_one_row_per_data_line(values in prop::collection::vec(-1e6f64..1e6, 0..60)) {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "data.dat", toa5_text(&values).as_bytes());

        let table = read_campbell_scientific(&path, DEFAULT_INDEX_COLUMN, None);

        prop_assert_eq!(table.len(), values.len());
        prop_assert!(table.index().windows(2).all(|w| w[0] <= w[1]));
        let column = table.column("Value").unwrap_or_default();
        for (read, written) in column.iter().zip(&values) {
            prop_assert!((read - written).abs() <= 1e-9 * written.abs().max(1.0));
        }
    }
}

#[test]
fn test_reader_missing_file_returns_empty() {
    let dir = TempDir::new().unwrap();
    let table = read_campbell_scientific(&dir.path().join("absent.dat"), "TIMESTAMP", None);
    assert!(table.is_empty());
    assert!(table.columns().is_empty());
}

#[test]
fn test_reader_unsupported_encoding_returns_empty() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "data.dat", toa5_text(&[1.0, 2.0]).as_bytes());

    let table = read_campbell_scientific(&path, "TIMESTAMP", Some("not-an-encoding"));
    assert!(table.is_empty());
}

#[test]
fn test_reader_corrupt_structure_returns_empty() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "data.dat", b"\x00\x01garbage\n\xff\xfe\xfd");

    let table = read_campbell_scientific(&path, "TIMESTAMP", None);
    assert!(table.is_empty());
    assert!(try_read_campbell_scientific(&path, "TIMESTAMP", None).is_err());
}

#[test]
fn test_reader_utf16_file() {
    let dir = TempDir::new().unwrap();
    let mut bytes = vec![0xFF, 0xFE];
    for unit in toa5_text(&[1.5, 2.5]).encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let path = write_file(dir.path(), "data.dat", &bytes);

    let table = read_campbell_scientific(&path, "TIMESTAMP", Some("utf-16"));
    assert_eq!(table.len(), 2);
    assert_eq!(table.column("Value").unwrap(), vec![1.5, 2.5]);
}

#[test]
fn test_reader_drops_unnamed_columns() {
    let text = "\"TOA5\"\n\
                TIMESTAMP,A,Unnamed: 2,,B\n\
                TS,u,u,u,u\n\
                ,,,,\n\
                2015-01-01 00:00:00,1,x,y,2\n";
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "ragged.dat", text.as_bytes());

    let table = read_campbell_scientific(&path, "TIMESTAMP", None);
    assert_eq!(table.columns(), &["A", "B"]);
    assert_eq!(table.row(0).unwrap(), &[1.0, 2.0]);
}

// ============================================================================
// Test results
// ============================================================================

#[test]
fn test_test_results_read_back_sorted_and_indexed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test_results.csv");
    let start = base_time();
    let end = start + Duration::minutes(45);

    let mut results: TestResults = vec![
        TestResultRow::new("System2", "Wind").with_error_flag("Duplicate timestamp"),
        TestResultRow::new("System1", "Wave")
            .with_test_type("range")
            .with_window(start, end, 4)
            .with_error_flag("Data > upper bound, 1"),
        TestResultRow::new("System1", "Air Temp").with_error_flag("Missing data"),
        TestResultRow::new("System2", "Air Temp"),
    ]
    .into_iter()
    .collect();

    write_test_results(&path, &mut results).unwrap();
    let read = read_test_results(&path).unwrap();

    let keys: Vec<_> = read
        .rows()
        .iter()
        .map(|r| (r.system_name.clone(), r.variable_name.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("System1".to_string(), "Air Temp".to_string()),
            ("System1".to_string(), "Wave".to_string()),
            ("System2".to_string(), "Air Temp".to_string()),
            ("System2".to_string(), "Wind".to_string()),
        ]
    );
    assert_eq!(read.index(), &[1, 2, 3, 4]);

    let wave = &read.rows()[1];
    assert_eq!(wave.test_type.as_deref(), Some("range"));
    assert_eq!(wave.start_time, Some(start));
    assert_eq!(wave.end_time, Some(end));
    assert_eq!(wave.timesteps, Some(4));
    assert_eq!(read.rows()[2].error_flag, None);
}

#[test]
fn test_empty_test_results_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test_results.csv");
    write_test_results(&path, &mut TestResults::new()).unwrap();

    let read = read_test_results(&path).unwrap();
    assert!(read.is_empty());
}

// ============================================================================
// Metrics
// ============================================================================

#[test]
fn test_metrics_second_write_merges() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metrics.csv");

    let mut first = MetricsTable::new();
    first.push_row("2015-01-01", [("Completeness", 0.9), ("QCI", 0.8)]);
    first.push_row("2015-01-02", [("Completeness", 0.95), ("QCI", 0.85)]);
    write_metrics(&path, &first).unwrap();

    let mut second = MetricsTable::new();
    second.push_row("2015-01-02", [("Energy", 12.0)]);
    second.push_row("2015-01-03", [("Energy", 13.0)]);
    write_metrics(&path, &second).unwrap();

    let merged = read_metrics(&path).unwrap();
    assert_eq!(merged.columns(), &["Completeness", "QCI", "Energy"]);
    assert_eq!(
        merged.labels().collect::<Vec<_>>(),
        vec!["2015-01-01", "2015-01-02", "2015-01-03"]
    );
    assert_eq!(merged.get("2015-01-01", "Completeness"), Some(0.9));
    assert_eq!(merged.get("2015-01-01", "Energy"), None);
    assert_eq!(merged.get("2015-01-02", "QCI"), Some(0.85));
    assert_eq!(merged.get("2015-01-02", "Energy"), Some(12.0));
    assert_eq!(merged.get("2015-01-03", "Completeness"), None);
}

#[test]
fn test_metrics_overlapping_cells_take_newest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metrics.csv");

    let mut first = MetricsTable::new();
    first.push_row("run-1", [("A", 1.0)]);
    write_metrics(&path, &first).unwrap();

    let mut second = MetricsTable::new();
    second.push_row("run-1", [("A", 2.0)]);
    write_metrics(&path, &second).unwrap();

    let merged = read_metrics(&path).unwrap();
    assert_eq!(merged.get("run-1", "A"), Some(2.0));
    assert_eq!(merged.len(), 1);
}

#[test]
fn test_metrics_missing_cells_written_as_nan() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metrics.csv");

    let mut first = MetricsTable::new();
    first.push_row("d1", [("A", 1.0)]);
    write_metrics(&path, &first).unwrap();
    let mut second = MetricsTable::new();
    second.push_row("d2", [("B", 2.0)]);
    write_metrics(&path, &second).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "TIMESTEP,A,B\nd1,1.0,NaN\nd2,NaN,2.0\n");
}

proptest! {
    #[test]
    fn metrics_merge_keeps_union_and_newest(
        first in prop::collection::vec(-1000i32..1000, 1..8),
        second in prop::collection::vec(-1000i32..1000, 1..8),
        offset in 0usize..8,
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metrics.csv");

        let mut table = MetricsTable::new();
        for (i, v) in first.iter().enumerate() {
            table.push_row(format!("run-{:02}", i), [("A", f64::from(*v))]);
        }
        write_metrics(&path, &table).unwrap();

        let mut table = MetricsTable::new();
        for (i, v) in second.iter().enumerate() {
            table.push_row(
                format!("run-{:02}", i + offset),
                [("A", f64::from(*v)), ("B", f64::from(*v))],
            );
        }
        write_metrics(&path, &table).unwrap();

        let merged = read_metrics(&path).unwrap();
        prop_assert_eq!(merged.columns(), &["A", "B"]);
        let labels: std::collections::BTreeSet<usize> =
            (0..first.len()).chain(offset..offset + second.len()).collect();
        prop_assert_eq!(merged.len(), labels.len());
        for (i, v) in second.iter().enumerate() {
            let label = format!("run-{:02}", i + offset);
            prop_assert_eq!(merged.get(&label, "A"), Some(f64::from(*v)));
            prop_assert_eq!(merged.get(&label, "B"), Some(f64::from(*v)));
        }
        for (i, v) in first.iter().enumerate().filter(|(i, _)| *i < offset) {
            let label = format!("run-{:02}", i);
            prop_assert_eq!(merged.get(&label, "A"), Some(f64::from(*v)));
            prop_assert_eq!(merged.get(&label, "B"), None);
        }
    }
}
