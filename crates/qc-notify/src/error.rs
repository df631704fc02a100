//! Error types for email delivery.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for notifier operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Errors that can occur while building or sending an email.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("no recipients")]
    NoRecipients,

    #[error("failed to read attachment '{}': {source}", path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("invalid mail host '{0}'")]
    InvalidHost(String),

    #[error("delivery failed: {0}")]
    Delivery(#[from] lettre::transport::smtp::Error),
}
