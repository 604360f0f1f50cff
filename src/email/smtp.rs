//! SMTP transport for outgoing mail.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{EmailMessage, Mailer};
use crate::config::settings::SmtpConfig;
use crate::error::{IdentityError, Result};

/// Mailer delivering through an SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a transport from the configured relay settings
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let mut builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| IdentityError::Config(format!("Invalid SMTP relay: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        builder = builder.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    fn mailbox(address: &str) -> Result<Mailbox> {
        address
            .parse()
            .map_err(|e| IdentityError::Dispatch(format!("Invalid address {}: {}", address, e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let email = Message::builder()
            .from(Self::mailbox(&message.from)?)
            .to(Self::mailbox(&message.to)?)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                message.html.clone(),
            ))
            .map_err(|e| IdentityError::Dispatch(format!("Message build failed: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| IdentityError::Dispatch(format!("SMTP send failed: {}", e)))?;

        debug!("Delivered '{}' to {}", message.subject, message.to);
        Ok(())
    }
}
