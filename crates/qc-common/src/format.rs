//! Value and timestamp formatting shared by CSV and HTML output.

use chrono::{NaiveDate, NaiveDateTime};

/// Token written for missing cells.
pub const MISSING: &str = "NaN";

/// Layout used when writing timestamps.
const TIMESTAMP_OUTPUT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Layouts accepted when parsing timestamps, tried in order.
const TIMESTAMP_INPUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS[.fff]`.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_OUTPUT).to_string()
}

/// Parse a timestamp in any of the accepted layouts.
///
/// Date-only values (`YYYY-MM-DD`) resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    TIMESTAMP_INPUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Format a float for delimited output.
///
/// Missing values become [`MISSING`]; integral values keep one decimal
/// place so the column still reads back as floating point.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        MISSING.to_string()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Format a float with a fixed number of decimal places.
pub fn format_value_with_precision(value: f64, precision: usize) -> String {
    if value.is_nan() {
        MISSING.to_string()
    } else {
        format!("{:.*}", precision, value)
    }
}

/// Parse a delimited-text cell as a float.
///
/// Empty cells and `NaN`-like tokens (any case) are missing. Returns `None`
/// only for cells that are neither numeric nor a missing marker.
pub fn parse_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_missing() {
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_value_integral_keeps_decimal() {
        assert_eq!(format_value(3.0), "3.0");
        assert_eq!(format_value(-12.0), "-12.0");
        assert_eq!(format_value(0.25), "0.25");
    }

    #[test]
    fn test_format_value_with_precision() {
        assert_eq!(format_value_with_precision(1.5, 3), "1.500");
        assert_eq!(format_value_with_precision(f64::NAN, 3), "NaN");
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2015, 1, 1)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2015-01-01 06:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2015-01-01 06:30"), Some(expected));
        assert_eq!(parse_timestamp("2015-01-01T06:30:00"), Some(expected));
        assert_eq!(parse_timestamp("01/01/2015 06:30"), Some(expected));
        assert_eq!(parse_timestamp(" 2015-01-01 06:30:00 "), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        let ts = parse_timestamp("2015-01-01").unwrap();
        assert_eq!(format_timestamp(&ts), "2015-01-01 00:00:00");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("TS"), None);
        assert_eq!(parse_timestamp("2015-13-45 00:00:00"), None);
    }

    #[test]
    fn test_format_timestamp_fractional() {
        let ts = parse_timestamp("2015-01-01 00:00:00.5").unwrap();
        assert_eq!(format_timestamp(&ts), "2015-01-01 00:00:00.500");
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("1.25"), Some(1.25));
        assert!(parse_value("NAN").unwrap().is_nan());
        assert!(parse_value("").unwrap().is_nan());
        assert_eq!(parse_value("abc"), None);
    }
}
