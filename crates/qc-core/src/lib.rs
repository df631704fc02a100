//! qc-monitor command-line front end.
//!
//! The `qc` binary wires the reader, writers, renderers and notifier to
//! a TOML run configuration and structured logging. This library holds
//! the pieces the binary and its tests share.

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;

pub use config::{load_config, ConfigError, ConfigSource, LoadedConfig, QcConfig};
pub use error::CommandError;
pub use exit_codes::ExitCode;
