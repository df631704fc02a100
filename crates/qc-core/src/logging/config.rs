//! Logging configuration.
//!
//! Layered from the `[logging]` section of the run configuration, then
//! `QC_LOG` / `QC_LOG_FORMAT`, then CLI flags. `RUST_LOG` bypasses all of
//! this and sets the filter directly (see [`init_logging`](super::init_logging)).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    #[value(alias = "json")]
    Jsonl,
}

/// Minimum level of events kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Level name as written in filter directives.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// The `[logging]` section of the run configuration. Unset fields keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<LogLevel>,
    pub format: Option<LogFormat>,
    pub timestamps: Option<bool>,
    /// Plain-text log of the current run; also the report's notes source.
    pub log_file: Option<PathBuf>,
}

/// Resolved logging settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Timestamps on human output.
    pub timestamps: bool,
    /// Truncated at startup, then receives a plain-text copy of every event.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Layer the config file, then the environment, then CLI overrides over defaults.
    pub fn from_sources(
        section: &LoggingSection,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        if let Some(level) = section.level {
            config.level = level;
        }
        if let Some(format) = section.format {
            config.format = format;
        }
        if let Some(timestamps) = section.timestamps {
            config.timestamps = timestamps;
        }
        config.log_file = section.log_file.clone();

        if let Some(level) = env_value::<LogLevel>("QC_LOG") {
            config.level = level;
        }
        if let Some(format) = env_value::<LogFormat>("QC_LOG_FORMAT") {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }
}

/// Parse an environment variable as a value enum; unset or unknown values are ignored.
fn env_value<T: ValueEnum>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    T::from_str(raw.trim(), true).ok()
}
