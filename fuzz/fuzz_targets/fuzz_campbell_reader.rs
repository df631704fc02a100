//! Fuzz target for Campbell Scientific CSV parsing.
//!
//! Logger exports arrive from field hardware and are often truncated or
//! corrupted; parsing must return an error, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use qc_io::{parse_campbell_scientific, DEFAULT_INDEX_COLUMN};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(table) = parse_campbell_scientific(text, DEFAULT_INDEX_COLUMN) {
            // cleaned index is sorted and unique
            assert!(table.index().windows(2).all(|w| w[0] < w[1]));
        }
    }
});
