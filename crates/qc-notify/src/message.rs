//! Email message construction.

use crate::error::{NotifyError, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use std::path::PathBuf;
use tracing::debug;

/// Body MIME type, chosen from the body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Plain,
    Html,
}

impl BodyKind {
    pub fn content_type(&self) -> ContentType {
        match self {
            BodyKind::Plain => ContentType::TEXT_PLAIN,
            BodyKind::Html => ContentType::TEXT_HTML,
        }
    }
}

/// HTML when the body contains a closing `</html>` tag in any case.
pub fn body_content_type(body: &str) -> BodyKind {
    if body.to_lowercase().contains("</html>") {
        BodyKind::Html
    } else {
        BodyKind::Plain
    }
}

/// What to send and to whom.
#[derive(Debug, Clone, Default)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
    pub sender: String,
    /// File attached as raw bytes under its base filename.
    pub attachment: Option<PathBuf>,
}

impl EmailMessage {
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            sender: sender.into(),
            ..Default::default()
        }
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address.parse().map_err(|source| NotifyError::Address {
        address: address.to_string(),
        source,
    })
}

/// Build a multipart/mixed message: the body, then the attachment if any.
pub fn build_message(message: &EmailMessage) -> Result<Message> {
    if message.recipients.is_empty() {
        return Err(NotifyError::NoRecipients);
    }

    let mut builder = Message::builder()
        .from(parse_mailbox(&message.sender)?)
        .subject(message.subject.as_str());
    for recipient in &message.recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let kind = body_content_type(&message.body);
    debug!(?kind, "Selected body type");
    let body = SinglePart::builder()
        .header(kind.content_type())
        .body(message.body.clone());
    let mut parts = MultiPart::mixed().singlepart(body);

    if let Some(path) = &message.attachment {
        let bytes = std::fs::read(path).map_err(|source| NotifyError::Attachment {
            path: path.clone(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        debug!(filename = %filename, bytes = bytes.len(), "Attaching file");
        let content_type = ContentType::parse("application/octet-stream")?;
        parts = parts.singlepart(Attachment::new(filename).body(bytes, content_type));
    }

    Ok(builder.multipart(parts)?)
}
