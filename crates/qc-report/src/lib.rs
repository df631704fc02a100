//! HTML monitoring reports and dashboards.
//!
//! Renders self-contained HTML documents from fixed templates.
//!
//! # Documents
//!
//! - **Monitoring report**: QC test results, metrics, notes, graphics and
//!   configuration for one system
//! - **Dashboard**: a grid comparing systems/locations, one cell per
//!   (row, column) label pair
//!
//! # Features
//!
//! - **Explicit table formatting**: every render call takes a [`RenderConfig`]
//! - **Inline graphics**: `encode` embeds images as `data:` URIs; an
//!   unreadable image is an error, never a silently missing picture
//! - **Interactive dashboards**: optional DataTables enhancement from a pinned CDN
//!
//! # Example
//!
//! ```no_run
//! use qc_common::{TestResults, TimeSeriesTable};
//! use qc_report::{write_monitoring_report, MonitoringReportOptions, MonitoringRun, RenderConfig};
//! use std::path::Path;
//!
//! let run = MonitoringRun::new(TimeSeriesTable::empty(), TestResults::new());
//! let options = MonitoringReportOptions::default().with_title("Station 4");
//! write_monitoring_report(Path::new("report.html"), &run, &options, &RenderConfig::default())
//!     .unwrap();
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
mod html;
pub mod images;
pub mod report;
pub mod table;

pub use config::{CdnConfig, CdnLibrary, Justify, RenderConfig, ReportTheme};
pub use dashboard::{render_dashboard, write_dashboard, DashboardCell, DashboardSpec};
pub use error::{ReportError, Result};
pub use report::{
    render_monitoring_report, write_monitoring_report, MonitoringReportOptions, MonitoringResults,
    MonitoringRun,
};
pub use table::HtmlTable;
