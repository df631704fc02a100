//! Email delivery for monitoring results.
//!
//! Builds a multipart message (plain or HTML body, optional attachment)
//! and sends it over SMTP with a best-effort authenticated handshake.

pub mod error;
pub mod message;
pub mod smtp;

pub use error::{NotifyError, Result};
pub use message::{body_content_type, build_message, BodyKind, EmailMessage};
pub use smtp::{send_email, SmtpSettings, DEFAULT_SMTP_PORT};
