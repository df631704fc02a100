//! Dashboard renderer: a grid comparing systems or locations.
//!
//! Rows and columns are laid out in the order given by the spec; each
//! (row, column) pair shows whatever content was supplied for it.

use crate::config::RenderConfig;
use crate::error::{ReportError, Result};
use crate::html::{date_stamp, finish, generator_version, html_escape, BASE_STYLE};
use crate::images::{image_src, image_srcs};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Content of one dashboard cell. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub graphics: Vec<PathBuf>,
    /// Pre-rendered HTML table, inserted as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
}

impl DashboardCell {
    /// Cell holding only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_graphic(mut self, path: impl Into<PathBuf>) -> Self {
        self.graphics.push(path.into());
        self
    }

    pub fn with_table(mut self, html: impl Into<String>) -> Self {
        self.table = Some(html.into());
        self
    }

    pub fn with_link(mut self, href: impl Into<String>, text: Option<String>) -> Self {
        self.link = Some(href.into());
        self.link_text = text;
        self
    }

    fn is_empty(&self) -> bool {
        self.text.is_none() && self.graphics.is_empty() && self.table.is_none() && self.link.is_none()
    }
}

/// Layout and content of a dashboard.
///
/// In TOML/JSON the content map is written as a `cells` list whose
/// entries carry `row` and `column` next to the cell fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSpec {
    pub column_names: Vec<String>,
    pub row_names: Vec<String>,
    #[serde(rename = "cells", with = "cell_list")]
    pub content: HashMap<(String, String), DashboardCell>,
    pub title: String,
    pub footnote: Option<String>,
    pub logo: Option<PathBuf>,
    /// Display width of cell graphics, in pixels.
    pub im_width: u32,
    /// Enhance the grid with DataTables.
    pub datatables: bool,
    /// Embed graphics as `data:` URIs instead of linking them.
    pub encode: bool,
}

impl Default for DashboardSpec {
    fn default() -> Self {
        Self {
            column_names: Vec::new(),
            row_names: Vec::new(),
            content: HashMap::new(),
            title: "Dashboard".to_string(),
            footnote: None,
            logo: None,
            im_width: 250,
            datatables: false,
            encode: false,
        }
    }
}

impl DashboardSpec {
    pub fn new<C, R, S>(column_names: C, row_names: R) -> Self
    where
        C: IntoIterator<Item = S>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column_names: column_names.into_iter().map(Into::into).collect(),
            row_names: row_names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set the content of the cell at (`row`, `column`).
    pub fn with_cell(
        mut self,
        row: impl Into<String>,
        column: impl Into<String>,
        cell: DashboardCell,
    ) -> Self {
        self.content.insert((row.into(), column.into()), cell);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_footnote(mut self, footnote: impl Into<String>) -> Self {
        self.footnote = Some(footnote.into());
        self
    }

    pub fn with_logo(mut self, logo: impl Into<PathBuf>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn with_datatables(mut self, datatables: bool) -> Self {
        self.datatables = datatables;
        self
    }

    pub fn with_encode(mut self, encode: bool) -> Self {
        self.encode = encode;
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(dup) = first_duplicate(&self.row_names) {
            return Err(ReportError::InvalidDashboard(format!(
                "duplicate row name '{}'",
                dup
            )));
        }
        if let Some(dup) = first_duplicate(&self.column_names) {
            return Err(ReportError::InvalidDashboard(format!(
                "duplicate column name '{}'",
                dup
            )));
        }
        Ok(())
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}

/// Render a dashboard and write it to `path`, overwriting any existing file.
pub fn write_dashboard(path: &Path, spec: &DashboardSpec, config: &RenderConfig) -> Result<()> {
    let html = render_dashboard(spec, config)?;
    std::fs::write(path, &html)?;
    info!(path = %path.display(), bytes = html.len(), "Dashboard written");
    Ok(())
}

/// Render a dashboard to a string.
pub fn render_dashboard(spec: &DashboardSpec, config: &RenderConfig) -> Result<String> {
    spec.validate()?;
    info!(
        title = %spec.title,
        rows = spec.row_names.len(),
        columns = spec.column_names.len(),
        "Rendering dashboard"
    );

    let unplaced = spec
        .content
        .keys()
        .filter(|(row, column)| !spec.row_names.contains(row) || !spec.column_names.contains(column))
        .count();
    if unplaced > 0 {
        debug!(unplaced, "Cells outside the row/column layout are not rendered");
    }

    let logo = spec
        .logo
        .as_deref()
        .map(|p| image_src(p, spec.encode))
        .transpose()?;

    let mut header = String::from("<th></th>");
    for column in &spec.column_names {
        header.push_str(&format!("<th>{}</th>", html_escape(column)));
    }

    let mut body = String::new();
    for row in &spec.row_names {
        body.push_str(&format!("\n            <tr>\n                <th>{}</th>", html_escape(row)));
        for column in &spec.column_names {
            match spec.content.get(&(row.clone(), column.clone())) {
                Some(cell) if !cell.is_empty() => {
                    body.push_str(&render_cell(cell, spec.im_width, spec.encode)?);
                }
                _ => body.push_str("\n                <td class=\"dashboard-empty\"></td>"),
            }
        }
        body.push_str("\n            </tr>");
    }

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="qc-monitor {version}">
    {datatables_head}
    <style>{style}{dashboard_style}</style>
</head>
<body>
    <header>
        {logo}
        <h1>{title}</h1>
    </header>

    <main>
        <table id="dashboard" class="dashboard display">
            <thead>
                <tr>{header}</tr>
            </thead>
            <tbody>{body}
            </tbody>
        </table>
        {footnote}
    </main>

    <footer>
        <p>Generated by qc-monitor version {version} on {date}</p>
    </footer>
    {datatables_init}
</body>
</html>"##,
        theme_class = config.theme.css_class(),
        title = html_escape(&spec.title),
        version = generator_version(),
        datatables_head = if spec.datatables {
            datatables_head(config)
        } else {
            String::new()
        },
        style = BASE_STYLE,
        dashboard_style = DASHBOARD_STYLE,
        logo = logo
            .map(|src| format!(r#"<img class="logo" src="{}" alt="Logo">"#, html_escape(&src)))
            .unwrap_or_default(),
        header = header,
        body = body,
        footnote = spec
            .footnote
            .as_deref()
            .map(|note| format!(r#"<p class="meta footnote">{}</p>"#, html_escape(note)))
            .unwrap_or_default(),
        date = date_stamp(),
        datatables_init = if spec.datatables {
            DATATABLES_INIT
        } else {
            ""
        },
    );

    Ok(finish(html, config))
}

fn render_cell(cell: &DashboardCell, im_width: u32, encode: bool) -> Result<String> {
    let mut parts = String::new();
    if let Some(text) = &cell.text {
        parts.push_str(&format!(
            "\n                    <div class=\"cell-text\">{}</div>",
            html_escape(text)
        ));
    }
    for src in image_srcs(&cell.graphics, encode)? {
        parts.push_str(&format!(
            "\n                    <div class=\"cell-graphics\"><img src=\"{}\" width=\"{}\" alt=\"\"></div>",
            html_escape(&src),
            im_width
        ));
    }
    if let Some(table) = &cell.table {
        parts.push_str(&format!(
            "\n                    <div class=\"cell-table\">{}</div>",
            table
        ));
    }
    if let Some(link) = &cell.link {
        let text = cell.link_text.as_deref().unwrap_or(link);
        parts.push_str(&format!(
            "\n                    <a class=\"cell-link\" href=\"{}\">{}</a>",
            html_escape(link),
            html_escape(text)
        ));
    }
    Ok(format!(
        "\n                <td class=\"dashboard-cell\">{}\n                </td>",
        parts
    ))
}

fn datatables_head(config: &RenderConfig) -> String {
    format!(
        "{}\n    {}\n    {}",
        config.cdn.stylesheet_tag("datatables.net-dt"),
        config.cdn.script_tag("jquery"),
        config.cdn.script_tag("datatables.net")
    )
}

const DATATABLES_INIT: &str = r#"<script>
        $(document).ready(function() {
            $('#dashboard').DataTable({ paging: false });
        });
    </script>"#;

const DASHBOARD_STYLE: &str = r#"
        table.dashboard {
            border-collapse: collapse;
        }
        table.dashboard th, table.dashboard td {
            border: 1px solid var(--border-color);
            padding: 0.5rem;
            vertical-align: top;
        }
        table.dashboard thead th {
            background-color: var(--bg-secondary);
        }
        .cell-text {
            font-weight: 600;
        }
        .cell-table table {
            font-size: 0.75rem;
        }
        .footnote {
            margin-top: 1rem;
        }
"#;

/// Serde adapter: the (row, column) map as a list of `{row, column, ..cell}` entries.
mod cell_list {
    use super::DashboardCell;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize)]
    struct CellEntry {
        row: String,
        column: String,
        #[serde(flatten)]
        cell: DashboardCell,
    }

    pub fn serialize<S: Serializer>(
        content: &HashMap<(String, String), DashboardCell>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let mut entries: Vec<CellEntry> = content
            .iter()
            .map(|((row, column), cell)| CellEntry {
                row: row.clone(),
                column: column.clone(),
                cell: cell.clone(),
            })
            .collect();
        entries.sort_by(|a, b| (&a.row, &a.column).cmp(&(&b.row, &b.column)));
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<HashMap<(String, String), DashboardCell>, D::Error> {
        let entries = Vec::<CellEntry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|e| ((e.row, e.column), e.cell))
            .collect())
    }
}
