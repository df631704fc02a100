//! Command errors and their exit codes.

use crate::config::ConfigError;
use crate::exit_codes::ExitCode;
use qc_notify::NotifyError;
use qc_report::ReportError;
use thiserror::Error;

/// Failure of a `qc` subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid argument: {0}")]
    Args(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unusable input: {0}")]
    Input(String),

    #[error(transparent)]
    Data(#[from] qc_io::IoError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CommandError::Args(_) => ExitCode::ArgsError,
            CommandError::Config(_) => ExitCode::ConfigError,
            CommandError::Input(_) => ExitCode::InputError,
            CommandError::Data(qc_io::IoError::Io(_)) => ExitCode::IoError,
            CommandError::Data(_) => ExitCode::InputError,
            CommandError::Report(e) => match e {
                ReportError::ImageRead { .. }
                | ReportError::NotesRead { .. }
                | ReportError::InvalidDashboard(_) => ExitCode::InputError,
                ReportError::IoError(_) => ExitCode::IoError,
                ReportError::JsonError(_) => ExitCode::InternalError,
            },
            CommandError::Notify(e) => match e {
                NotifyError::Address { .. }
                | NotifyError::NoRecipients
                | NotifyError::InvalidHost(_) => ExitCode::ArgsError,
                NotifyError::Attachment { .. } => ExitCode::InputError,
                NotifyError::Delivery(_) => ExitCode::DeliveryError,
                NotifyError::ContentType(_) | NotifyError::Message(_) => ExitCode::InternalError,
            },
            CommandError::Io(_) => ExitCode::IoError,
            CommandError::Json(_) => ExitCode::InternalError,
        }
    }
}
