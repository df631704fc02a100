//! Monitoring report renderer.
//!
//! One report covers one system: run window, QC test results, metrics,
//! notes from the run log, graphics, and the configuration used.

use crate::config::RenderConfig;
use crate::error::{ReportError, Result};
use crate::html::{date_stamp, finish, generator_version, html_escape, BASE_STYLE};
use crate::images::{image_src, image_srcs};
use crate::table::HtmlTable;
use qc_common::{format_timestamp, MetricsTable, TestResults, TimeSeriesTable, MISSING};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Source of the data and test results a report summarizes.
pub trait MonitoringResults {
    /// Time series the QC tests ran over.
    fn data(&self) -> &TimeSeriesTable;
    /// Outcomes of the QC tests.
    fn test_results(&self) -> &TestResults;
}

/// Plain owned [`MonitoringResults`].
#[derive(Debug, Clone, Default)]
pub struct MonitoringRun {
    pub data: TimeSeriesTable,
    pub test_results: TestResults,
}

impl MonitoringRun {
    pub fn new(data: TimeSeriesTable, test_results: TestResults) -> Self {
        Self { data, test_results }
    }
}

impl MonitoringResults for MonitoringRun {
    fn data(&self) -> &TimeSeriesTable {
        &self.data
    }

    fn test_results(&self) -> &TestResults {
        &self.test_results
    }
}

/// Report inputs beyond the monitoring results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringReportOptions {
    /// Graphics highlighting data that failed a QC test.
    pub test_results_graphics: Vec<PathBuf>,
    /// User-supplied graphics.
    pub custom_graphics: Vec<PathBuf>,
    /// Performance metrics table.
    pub metrics: Option<MetricsTable>,
    /// Report title; directory components are stripped.
    pub title: String,
    /// Configuration printed at the end of the report.
    pub config: BTreeMap<String, serde_json::Value>,
    /// Graphic shown in the report header.
    pub logo: Option<PathBuf>,
    /// Display width of test-result graphics, in pixels.
    pub im_width_test_results: u32,
    /// Display width of custom graphics, in pixels.
    pub im_width_custom: u32,
    /// Embed graphics as `data:` URIs instead of linking them.
    pub encode: bool,
    /// Log file whose lines become the report notes.
    pub notes_path: Option<PathBuf>,
}

impl Default for MonitoringReportOptions {
    fn default() -> Self {
        Self {
            test_results_graphics: Vec::new(),
            custom_graphics: Vec::new(),
            metrics: None,
            title: "Monitoring Report".to_string(),
            config: BTreeMap::new(),
            logo: None,
            im_width_test_results: 700,
            im_width_custom: 700,
            encode: false,
            notes_path: None,
        }
    }
}

impl MonitoringReportOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsTable) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_test_results_graphics(mut self, graphics: Vec<PathBuf>) -> Self {
        self.test_results_graphics = graphics;
        self
    }

    pub fn with_custom_graphics(mut self, graphics: Vec<PathBuf>) -> Self {
        self.custom_graphics = graphics;
        self
    }

    pub fn with_logo(mut self, logo: impl Into<PathBuf>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn with_config_entry(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    pub fn with_encode(mut self, encode: bool) -> Self {
        self.encode = encode;
        self
    }

    pub fn with_notes_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.notes_path = Some(path.into());
        self
    }
}

/// Render a monitoring report and write it to `path`, overwriting any existing file.
pub fn write_monitoring_report<R: MonitoringResults + ?Sized>(
    path: &Path,
    results: &R,
    options: &MonitoringReportOptions,
    config: &RenderConfig,
) -> Result<()> {
    let html = render_monitoring_report(results, options, config)?;
    std::fs::write(path, &html)?;
    info!(path = %path.display(), bytes = html.len(), "Monitoring report written");
    Ok(())
}

/// Render a monitoring report to a string.
pub fn render_monitoring_report<R: MonitoringResults + ?Sized>(
    results: &R,
    options: &MonitoringReportOptions,
    config: &RenderConfig,
) -> Result<String> {
    info!(title = %options.title, "Rendering monitoring report");

    let data = results.data();
    let (start_time, end_time) = match (data.start(), data.end()) {
        (Some(start), Some(end)) => (format_timestamp(&start), format_timestamp(&end)),
        _ => {
            warn!("Empty database");
            (MISSING.to_string(), MISSING.to_string())
        }
    };

    let notes = read_notes(options.notes_path.as_deref())?;
    let test_results = results.test_results().sorted();
    let metrics = options.metrics.clone().unwrap_or_default();

    let test_results_graphics = image_srcs(&options.test_results_graphics, options.encode)?;
    let custom_graphics = image_srcs(&options.custom_graphics, options.encode)?;
    let logo = options
        .logo
        .as_deref()
        .map(|p| image_src(p, options.encode))
        .transpose()?;

    let fields = ReportFields {
        title: display_title(&options.title),
        logo,
        start_time,
        end_time,
        num_test_results: test_results.len(),
        test_results: HtmlTable::from_test_results(&test_results).render(config),
        num_metrics: metrics.len(),
        metrics: HtmlTable::from_metrics(&metrics, config).render(config),
        num_notes: notes.len(),
        notes: HtmlTable::from_lines(&notes).render(config),
        test_results_graphics,
        custom_graphics,
        im_width_test_results: options.im_width_test_results,
        im_width_custom: options.im_width_custom,
        config: &options.config,
        theme_class: config.theme.css_class(),
        date: date_stamp(),
        version: generator_version(),
    };

    Ok(finish(fields.render(), config))
}

/// Read log lines for the notes table; a missing file means no notes.
fn read_notes(path: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No notes file");
            Ok(Vec::new())
        }
        Err(source) => Err(ReportError::NotesRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Last path component of a title, so a file path can be passed as-is.
fn display_title(title: &str) -> String {
    Path::new(title)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| title.to_string())
}

/// Every value bound into the report template.
struct ReportFields<'a> {
    title: String,
    logo: Option<String>,
    start_time: String,
    end_time: String,
    num_test_results: usize,
    test_results: String,
    num_metrics: usize,
    metrics: String,
    num_notes: usize,
    notes: String,
    test_results_graphics: Vec<String>,
    custom_graphics: Vec<String>,
    im_width_test_results: u32,
    im_width_custom: u32,
    config: &'a BTreeMap<String, serde_json::Value>,
    theme_class: &'static str,
    date: String,
    version: &'static str,
}

impl ReportFields<'_> {
    fn render(&self) -> String {
        format!(
            r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="qc-monitor {version}">
    <style>{style}</style>
</head>
<body>
    <header>
        {logo}
        <h1>{title}</h1>
        <p class="meta">Start time: {start_time}<br>End time: {end_time}</p>
    </header>

    <main>
        {test_results_graphics}
        {custom_graphics}
        <section id="metrics">
            <h2>Performance Metrics ({num_metrics})</h2>
            {metrics}
        </section>

        <section id="test-results">
            <h2>Test Results ({num_test_results})</h2>
            {test_results}
        </section>

        <section id="notes">
            <h2>Notes ({num_notes})</h2>
            {notes}
        </section>

        <section id="configuration">
            <h2>Configuration Options</h2>
            {config}
        </section>
    </main>

    <footer>
        <p>Generated by qc-monitor version {version} on {date}</p>
    </footer>
</body>
</html>"##,
            theme_class = self.theme_class,
            title = html_escape(&self.title),
            version = self.version,
            style = BASE_STYLE,
            logo = self
                .logo
                .as_deref()
                .map(|src| format!(r#"<img class="logo" src="{}" alt="Logo">"#, html_escape(src)))
                .unwrap_or_default(),
            start_time = html_escape(&self.start_time),
            end_time = html_escape(&self.end_time),
            test_results_graphics = graphics_section(
                "test-results-graphics",
                "Test Results Graphics",
                &self.test_results_graphics,
                self.im_width_test_results,
            ),
            custom_graphics = graphics_section(
                "custom-graphics",
                "Custom Graphics",
                &self.custom_graphics,
                self.im_width_custom,
            ),
            num_metrics = self.num_metrics,
            metrics = table_or_none(self.num_metrics, &self.metrics),
            num_test_results = self.num_test_results,
            test_results = table_or_none(self.num_test_results, &self.test_results),
            num_notes = self.num_notes,
            notes = table_or_none(self.num_notes, &self.notes),
            config = config_list(self.config),
            date = self.date,
        )
    }
}

fn graphics_section(id: &str, heading: &str, srcs: &[String], width: u32) -> String {
    if srcs.is_empty() {
        return String::new();
    }
    let images: String = srcs
        .iter()
        .map(|src| {
            format!(
                r#"
            <p><img class="graphic" src="{}" width="{}" alt="{}"></p>"#,
                html_escape(src),
                width,
                html_escape(heading)
            )
        })
        .collect();
    format!(
        r#"<section id="{id}">
            <h2>{heading}</h2>{images}
        </section>"#
    )
}

fn table_or_none(rows: usize, table: &str) -> String {
    if rows == 0 {
        r#"<p class="meta">None</p>"#.to_string()
    } else {
        table.to_string()
    }
}

fn config_list(config: &BTreeMap<String, serde_json::Value>) -> String {
    if config.is_empty() {
        return r#"<p class="meta">None</p>"#.to_string();
    }
    let items: String = config
        .iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "\n                <li><b>{}</b>: {}</li>",
                html_escape(key),
                html_escape(&value)
            )
        })
        .collect();
    format!("<ul class=\"config\">{}\n            </ul>", items)
}
