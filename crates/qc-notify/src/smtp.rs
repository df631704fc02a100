//! SMTP delivery.
//!
//! Each delivery first opens a secured session: STARTTLS plus login when
//! credentials are set, opportunistic STARTTLS otherwise. If that session
//! cannot be established, delivery goes ahead over a plain, unauthenticated
//! session. A server that cannot be reached at all is an error.

use crate::error::{NotifyError, Result};
use crate::message::{build_message, EmailMessage};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{SmtpTransport, Transport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Port used when the host has none.
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// Mail host and optional login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    /// `host` or `host:port`.
    pub host: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            username: None,
            password: None,
        }
    }
}

impl SmtpSettings {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Split `host[:port]`, defaulting to port 25.
    pub fn host_and_port(&self) -> Result<(String, u16)> {
        let raw = self.host.trim();
        let (host, port) = match raw.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| NotifyError::InvalidHost(raw.to_string()))?;
                (host, port)
            }
            None => (raw, DEFAULT_SMTP_PORT),
        };
        if host.is_empty() {
            return Err(NotifyError::InvalidHost(raw.to_string()));
        }
        Ok((host.to_string(), port))
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        }
    }
}

/// Build the message and deliver it. Blocks until the server accepts or fails.
pub fn send_email(message: &EmailMessage, settings: &SmtpSettings) -> Result<()> {
    let email = build_message(message)?;
    let (host, port) = settings.host_and_port()?;
    info!(
        host = %host,
        port,
        recipients = message.recipients.len(),
        attachment = message.attachment.is_some(),
        "Sending email"
    );

    let transport = open_transport(&host, port, settings)?;
    let response = transport.send(&email)?;
    info!(code = %response.code(), "Email accepted");
    Ok(())
}

fn open_transport(host: &str, port: u16, settings: &SmtpSettings) -> Result<SmtpTransport> {
    let tls = TlsParameters::new(host.to_string())?;
    let secured = match settings.credentials() {
        Some(credentials) => SmtpTransport::builder_dangerous(host)
            .port(port)
            .tls(Tls::Required(tls))
            .credentials(credentials)
            .build(),
        None => SmtpTransport::builder_dangerous(host)
            .port(port)
            .tls(Tls::Opportunistic(tls))
            .build(),
    };
    match secured.test_connection() {
        Ok(_) => {
            debug!(authenticated = settings.credentials().is_some(), "Secured session established");
            return Ok(secured);
        }
        Err(e) => debug!(error = %e, "STARTTLS or login failed; sending in plain text"),
    }

    // An unreachable server fails again on this session and surfaces from `send`.
    Ok(SmtpTransport::builder_dangerous(host)
        .port(port)
        .tls(Tls::None)
        .build())
}
