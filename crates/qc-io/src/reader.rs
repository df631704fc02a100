//! Campbell Scientific (TOA5) CSV reader.
//!
//! Layout of a TOA5 file:
//!
//! ```text
//! "TOA5","station","logger",...        <- metadata line, skipped
//! "TIMESTAMP","RECORD","Wave",...      <- header
//! "TS","RN","m",...                    <- units, skipped
//! "","","Smp",...                      <- processing, skipped
//! "2015-01-01 00:00:00",0,0.5,...      <- data
//! ```

use crate::error::{IoError, Result};
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use qc_common::{parse_timestamp, parse_value, TimeSeriesTable};
use regex::Regex;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default name of the timestamp column.
pub const DEFAULT_INDEX_COLUMN: &str = "TIMESTAMP";

/// Lines before the header.
const METADATA_LINES: usize = 1;

/// Rows between the header and the first data row (units, processing).
const ROWS_AFTER_HEADER: usize = 2;

/// Header names produced by ragged files: blank, or spreadsheet-style `Unnamed: N`.
static UNNAMED_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*$|^Unnamed").expect("valid unnamed-column pattern"));

/// Read a Campbell Scientific CSV file.
///
/// Never fails: any error is logged and an empty table is returned, so
/// callers must treat an empty table as the failure signal. Use
/// [`try_read_campbell_scientific`] to get the cause.
pub fn read_campbell_scientific(
    path: &Path,
    index_col: &str,
    encoding: Option<&str>,
) -> TimeSeriesTable {
    match try_read_campbell_scientific(path, index_col, encoding) {
        Ok(table) => table,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Cannot extract data, CSV file reader failed"
            );
            TimeSeriesTable::empty()
        }
    }
}

/// Read a Campbell Scientific CSV file, returning the cause on failure.
pub fn try_read_campbell_scientific(
    path: &Path,
    index_col: &str,
    encoding: Option<&str>,
) -> Result<TimeSeriesTable> {
    info!(path = %path.display(), "Reading Campbell Scientific CSV file");

    let bytes = std::fs::read(path)?;
    let text = decode(&bytes, encoding)?;
    parse_campbell_scientific(&text, index_col)
}

/// Parse TOA5 text already decoded to UTF-8.
pub fn parse_campbell_scientific(text: &str, index_col: &str) -> Result<TimeSeriesTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    for _ in 0..METADATA_LINES {
        records.next().transpose()?.ok_or(IoError::MissingHeader)?;
    }
    let header = records.next().transpose()?.ok_or(IoError::MissingHeader)?;
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let index_pos = header
        .iter()
        .position(|h| h == index_col)
        .ok_or_else(|| IoError::MissingIndexColumn(index_col.to_string()))?;

    // (position in record, column name) of every value column kept
    let kept: Vec<(usize, &str)> = header
        .iter()
        .enumerate()
        .filter(|(i, name)| *i != index_pos && !UNNAMED_COLUMN.is_match(name))
        .map(|(i, name)| (i, name.as_str()))
        .collect();
    let dropped = header.len() - 1 - kept.len();
    if dropped > 0 {
        debug!(dropped, "Dropped unnamed columns");
    }

    let mut table = TimeSeriesTable::new(kept.iter().map(|(_, name)| *name))?;

    for _ in 0..ROWS_AFTER_HEADER {
        if records.next().transpose()?.is_none() {
            break;
        }
    }

    let mut bad_timestamps = 0usize;
    for (row, record) in records.enumerate() {
        let record = record?;
        if record.len() > header.len() {
            return Err(IoError::RaggedRow {
                row: row + 1,
                expected: header.len(),
                actual: record.len(),
            });
        }

        let Some(timestamp) = record.get(index_pos).and_then(parse_timestamp) else {
            bad_timestamps += 1;
            continue;
        };

        let mut values = Vec::with_capacity(kept.len());
        for &(pos, name) in &kept {
            let raw = record.get(pos).unwrap_or("");
            let value = parse_value(raw).ok_or_else(|| IoError::InvalidValue {
                row: row + 1,
                column: name.to_string(),
                value: raw.to_string(),
            })?;
            values.push(value);
        }
        table.push_row(timestamp, values)?;
    }

    if bad_timestamps > 0 {
        debug!(rows = bad_timestamps, "Dropped rows with unparseable timestamps");
    }

    table.sort_by_index();
    let duplicates = table.dedup_index();
    if duplicates > 0 {
        warn!(rows = duplicates, "Dropped rows with duplicate timestamps");
    }

    debug!(
        rows = table.len(),
        columns = table.columns().len(),
        "Parsed Campbell Scientific data"
    );
    Ok(table)
}

/// Decode raw bytes using a WHATWG encoding label, UTF-8 by default.
///
/// A byte-order mark overrides the label.
fn decode(bytes: &[u8], encoding: Option<&str>) -> Result<String> {
    let encoding = match encoding {
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| IoError::UnknownEncoding(label.to_string()))?,
        None => UTF_8,
    };
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(IoError::Decode {
            encoding: used.name().to_string(),
        });
    }
    Ok(text.into_owned())
}
