//! Rendering configuration types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Report color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTheme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Auto-detect from system preference.
    #[default]
    Auto,
}

impl ReportTheme {
    /// Get the CSS class for this theme.
    pub fn css_class(&self) -> &'static str {
        match self {
            ReportTheme::Light => "light",
            ReportTheme::Dark => "dark",
            ReportTheme::Auto => "",
        }
    }
}

/// Header alignment of rendered tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

impl Justify {
    /// CSS `text-align` value.
    pub fn css(&self) -> &'static str {
        match self {
            Justify::Left => "left",
            Justify::Center => "center",
            Justify::Right => "right",
        }
    }
}

/// CDN library configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnLibrary {
    /// Pinned version number.
    pub version: String,
    /// Subresource integrity hash (SHA-384), if known.
    #[serde(default)]
    pub sri: Option<String>,
    /// Path within npm package.
    #[serde(default)]
    pub path: Option<String>,
}

impl CdnLibrary {
    /// Create a new CDN library configuration.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            sri: None,
            path: None,
        }
    }

    /// Set the integrity hash.
    pub fn with_sri(mut self, sri: impl Into<String>) -> Self {
        self.sri = Some(sri.into());
        self
    }

    /// Set the path within the npm package.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Get the full CDN URL for this library.
    pub fn url(&self, base_url: &str, package_name: &str) -> String {
        let path = self.path.as_deref().unwrap_or("dist/index.min.js");
        format!("{}/{}@{}/{}", base_url, package_name, self.version, path)
    }

    /// `integrity`/`crossorigin` attributes, empty when no hash is pinned.
    pub fn integrity_attrs(&self) -> String {
        match &self.sri {
            Some(sri) => format!(r#" integrity="{}" crossorigin="anonymous""#, sri),
            None => String::new(),
        }
    }
}

/// CDN configuration for interactive dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnConfig {
    /// Base URL for CDN resources.
    #[serde(default = "default_cdn_base")]
    pub base_url: String,
    /// Library configurations, keyed by npm package name.
    #[serde(default = "default_libraries")]
    pub libraries: HashMap<String, CdnLibrary>,
}

fn default_cdn_base() -> String {
    "https://cdn.jsdelivr.net/npm".to_string()
}

/// Pinned versions only; integrity attributes appear once `sri` is configured.
fn default_libraries() -> HashMap<String, CdnLibrary> {
    let mut libs = HashMap::new();

    libs.insert(
        "jquery".to_string(),
        CdnLibrary::new("3.7.1").with_path("dist/jquery.min.js"),
    );

    // DataTables for sortable/searchable dashboards
    libs.insert(
        "datatables.net".to_string(),
        CdnLibrary::new("1.13.8").with_path("js/jquery.dataTables.min.js"),
    );
    libs.insert(
        "datatables.net-dt".to_string(),
        CdnLibrary::new("1.13.8").with_path("css/jquery.dataTables.min.css"),
    );

    libs
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            base_url: default_cdn_base(),
            libraries: default_libraries(),
        }
    }
}

impl CdnConfig {
    /// `<script>` tag for a configured library; empty when it is not configured.
    pub fn script_tag(&self, package_name: &str) -> String {
        match self.libraries.get(package_name) {
            Some(lib) => format!(
                r#"<script src="{}"{}></script>"#,
                lib.url(&self.base_url, package_name),
                lib.integrity_attrs()
            ),
            None => String::new(),
        }
    }

    /// Stylesheet `<link>` tag for a configured library; empty when it is not configured.
    pub fn stylesheet_tag(&self, package_name: &str) -> String {
        match self.libraries.get(package_name) {
            Some(lib) => format!(
                r#"<link rel="stylesheet" href="{}"{}>"#,
                lib.url(&self.base_url, package_name),
                lib.integrity_attrs()
            ),
            None => String::new(),
        }
    }
}

/// Explicit formatting options passed to every render call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Header alignment of tables.
    #[serde(default)]
    pub justify: Justify,
    /// Truncate table cells longer than this many characters.
    #[serde(default)]
    pub max_col_width: Option<usize>,
    /// Fixed decimal places for floats; shortest representation when unset.
    #[serde(default)]
    pub float_precision: Option<usize>,
    /// Color theme.
    #[serde(default)]
    pub theme: ReportTheme,
    /// Minify the generated HTML.
    #[serde(default)]
    pub minify: bool,
    /// CDN configuration.
    #[serde(default)]
    pub cdn: CdnConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            justify: Justify::default(),
            max_col_width: None,
            float_precision: None,
            theme: ReportTheme::default(),
            minify: false,
            cdn: CdnConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Create a new render configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set table header alignment.
    pub fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    /// Truncate long cells.
    pub fn with_max_col_width(mut self, width: usize) -> Self {
        self.max_col_width = Some(width);
        self
    }

    /// Render floats with fixed precision.
    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = Some(precision);
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: ReportTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Enable minification.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}
