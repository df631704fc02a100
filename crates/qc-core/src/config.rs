//! Run configuration for the `qc` binary.
//!
//! Resolution order: CLI `--config` → `QC_CONFIG` → XDG config dir → defaults.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! log_file = "qc.log"
//!
//! [report]
//! index_column = "TIMESTAMP"
//!
//! [report.options]
//! title = "Station 4"
//! encode = true
//!
//! [report.render]
//! float_precision = 3
//!
//! [email]
//! host = "mail.example.com:587"
//! sender = "qc@example.com"
//! recipients = ["ops@example.com"]
//! ```

use crate::logging::LoggingSection;
use qc_io::DEFAULT_INDEX_COLUMN;
use qc_report::{MonitoringReportOptions, RenderConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming a config file.
pub const ENV_CONFIG_PATH: &str = "QC_CONFIG";

/// Application name for XDG directories.
const APP_NAME: &str = "qc-monitor";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.toml";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the configuration came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,
    /// Set via environment variable.
    Environment,
    /// Found in XDG config directory.
    XdgConfig,
    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Settings for `qc read` and `qc report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Timestamp column of logger exports.
    pub index_column: String,
    /// Character encoding of logger exports; UTF-8 when unset.
    pub encoding: Option<String>,
    /// Report defaults; CLI flags override individual fields.
    pub options: MonitoringReportOptions,
    pub render: RenderConfig,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            index_column: DEFAULT_INDEX_COLUMN.to_string(),
            encoding: None,
            options: MonitoringReportOptions::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Settings for `qc dashboard`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    pub render: RenderConfig,
}

/// Settings for `qc email`. The password only comes from the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSection {
    /// `host` or `host:port`.
    pub host: Option<String>,
    pub username: Option<String>,
    pub sender: Option<String>,
    pub recipients: Vec<String>,
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QcConfig {
    pub logging: LoggingSection,
    pub report: ReportSection,
    pub dashboard: DashboardSection,
    pub email: EmailSection,
}

impl QcConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::IoError {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Configuration with provenance information.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: QcConfig,
    /// File the config was read from (None if using defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Get the XDG config directory for qc-monitor.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Find the config file to use.
///
/// An explicit CLI path must exist. An environment or XDG path that does
/// not exist is skipped.
pub fn resolve_config_path(
    cli_path: Option<&Path>,
) -> Result<(Option<PathBuf>, ConfigSource), ConfigError> {
    // 1. CLI argument
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok((Some(path.to_path_buf()), ConfigSource::CliArgument));
    }

    // 2. Environment variable
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok((Some(path), ConfigSource::Environment));
        }
        debug!(path = %path.display(), "QC_CONFIG points to a missing file; ignoring");
    }

    // 3. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return Ok((Some(path), ConfigSource::XdgConfig));
        }
    }

    // 4. Built-in defaults
    Ok((None, ConfigSource::BuiltinDefault))
}

/// Resolve and load the run configuration.
pub fn load_config(cli_path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let (path, source) = resolve_config_path(cli_path)?;
    let config = match &path {
        Some(p) => QcConfig::load(p)?,
        None => QcConfig::default(),
    };
    Ok(LoadedConfig {
        config,
        path,
        source,
    })
}
