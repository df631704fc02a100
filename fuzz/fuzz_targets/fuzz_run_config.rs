//! Fuzz target for run configuration parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use qc_core::QcConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = QcConfig::from_toml(text);
    }
});
