//! Mail submission: deliver the HTML recommendation to one recipient.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ProviderError, Result};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// A single HTML email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}

/// SMTP submission over STARTTLS, authenticated as the sending account.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer that logs in as `username` and sends from that address.
    ///
    /// No connection is made until the first `send`.
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Result<Self> {
        let from: Mailbox = username
            .parse()
            .map_err(|e| ProviderError::Mail(format!("invalid sender address {username:?}: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| ProviderError::Config {
                service: "SMTP",
                reason: e.to_string(),
            })?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        Ok(Self { transport, from })
    }

    /// Assemble the MIME message for `email`.
    pub fn build_message(&self, email: OutgoingEmail) -> Result<Message> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| ProviderError::Mail(format!("invalid recipient {:?}: {e}", email.to)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body)
            .map_err(|e| ProviderError::Mail(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let recipient = email.to.clone();
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| ProviderError::Mail(e.to_string()))?;

        info!("Email sent successfully to {}", recipient);
        Ok(())
    }
}
