//! Fuzz target for dashboard descriptions.
//!
//! Any spec that deserializes must render or fail cleanly. Graphics are
//! linked, not encoded, so rendering never touches the filesystem.

#![no_main]

use libfuzzer_sys::fuzz_target;
use qc_report::{render_dashboard, DashboardSpec, RenderConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(mut spec) = serde_json::from_slice::<DashboardSpec>(data) {
        spec.encode = false;
        let _ = render_dashboard(&spec, &RenderConfig::default());
    }
});
