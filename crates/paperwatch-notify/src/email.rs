//! SMTP digest delivery.
//!
//! `EmailNotifier` implements [`Notifier`] over lettre's async SMTP
//! transport. Missing credentials disable delivery instead of failing the
//! cycle: notification is an optional output, not a pipeline stage.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

use paperwatch_core::{Error, Notifier, Paper, Result};

use crate::digest;

/// Default SMTP relay host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP delivery configuration.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Relay hostname.
    pub host: String,
    /// Submission port.
    pub port: u16,
    /// Login user. `None` disables delivery.
    pub user: Option<String>,
    /// Login password. `None` disables delivery.
    pub password: Option<String>,
    /// From address. Falls back to `user` when unset.
    pub sender: Option<String>,
    /// To address. `None` disables delivery.
    pub recipient: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            user: None,
            password: None,
            sender: None,
            recipient: None,
        }
    }
}

impl EmailConfig {
    /// Load configuration from `SMTP_*`, `SENDER_EMAIL`, and
    /// `RECIPIENT_EMAIL` environment variables.
    pub fn from_env() -> Self {
        let host =
            std::env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string());
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);
        let user = std::env::var("SMTP_USER").ok();
        let password = std::env::var("SMTP_PASSWORD").ok();
        let sender = std::env::var("SENDER_EMAIL").ok().or_else(|| user.clone());
        let recipient = std::env::var("RECIPIENT_EMAIL").ok();

        Self {
            host,
            port,
            user,
            password,
            sender,
            recipient,
        }
    }

    /// Whether delivery has everything it needs.
    pub fn is_complete(&self) -> bool {
        self.user.is_some() && self.password.is_some() && self.recipient.is_some()
    }
}

/// Notifier that emails the daily digest over SMTP with STARTTLS.
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    /// Create a notifier with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        if !config.is_complete() {
            debug!(
                subsystem = "notify",
                component = "smtp",
                host = %config.host,
                "SMTP credentials incomplete; digest delivery disabled"
            );
        }
        Self { config }
    }

    /// Create a notifier from environment variables.
    pub fn from_env() -> Self {
        Self::new(EmailConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// Assemble the multipart message for a batch of papers.
    fn build_message(&self, papers: &[Paper]) -> Result<Message> {
        let sender = self
            .config
            .sender
            .as_deref()
            .ok_or_else(|| Error::Notify("Sender address not set".to_string()))?;
        let recipient = self
            .config
            .recipient
            .as_deref()
            .ok_or_else(|| Error::Notify("Recipient address not set".to_string()))?;

        let from: Mailbox = sender
            .parse()
            .map_err(|e| Error::Notify(format!("Invalid sender address '{}': {}", sender, e)))?;
        let to: Mailbox = recipient.parse().map_err(|e| {
            Error::Notify(format!("Invalid recipient address '{}': {}", recipient, e))
        })?;

        let (subject, html) = digest::render(papers);
        let text = digest::render_text(papers);

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(text, html))
            .map_err(|e| Error::Notify(format!("Failed to build message: {}", e)))
    }

    /// Open the STARTTLS transport with the configured credentials.
    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let user = self
            .config
            .user
            .clone()
            .ok_or_else(|| Error::Notify("SMTP user not set".to_string()))?;
        let password = self
            .config
            .password
            .clone()
            .ok_or_else(|| Error::Notify("SMTP password not set".to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            .map_err(|e| Error::Notify(format!("Failed to open SMTP relay: {}", e)))?
            .port(self.config.port)
            .credentials(Credentials::new(user, password))
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, new_papers: &[Paper]) -> Result<()> {
        if new_papers.is_empty() {
            debug!(
                subsystem = "notify",
                component = "smtp",
                "No new papers; skipping digest"
            );
            return Ok(());
        }

        if !self.config.is_complete() {
            warn!(
                subsystem = "notify",
                component = "smtp",
                result_count = new_papers.len(),
                "SMTP credentials or recipient not set; skipping digest"
            );
            return Ok(());
        }

        let message = self.build_message(new_papers)?;
        let transport = self.build_transport()?;

        transport
            .send(message)
            .await
            .map_err(|e| Error::Notify(format!("Failed to send digest: {}", e)))?;

        info!(
            subsystem = "notify",
            component = "smtp",
            op = "notify",
            result_count = new_papers.len(),
            recipient = %self.config.recipient.as_deref().unwrap_or(""),
            "Digest sent"
        );
        Ok(())
    }
}
