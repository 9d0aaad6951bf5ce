// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail transport implementations.
//!
//! [`SmtpMailer`] is the production transport over lettre's async SMTP
//! client. [`LogMailer`] stands in when SMTP is disabled in config, logging
//! the digest instead of sending it, so development setups run without a
//! relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use tola_config::model::SmtpConfig;
use tola_core::{MailTransport, TolaError};

/// Production SMTP transport (STARTTLS relay, optional auth).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a transport from config. Fails on an unusable relay host or a
    /// malformed from address, both configuration errors.
    pub fn new(config: &SmtpConfig) -> Result<Self, TolaError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| TolaError::Config(format!("smtp relay `{}`: {e}", config.host)))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| TolaError::Config(format!("smtp.from_address: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> Result<String, TolaError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_HTML);

        for recipient in recipients {
            let mailbox = recipient
                .parse::<Mailbox>()
                .map_err(|e| TolaError::Transport {
                    message: format!("bad recipient address `{recipient}`: {e}"),
                    source: None,
                })?;
            builder = builder.to(mailbox);
        }

        let message = builder
            .body(html_body.to_string())
            .map_err(|e| TolaError::Transport {
                message: format!("message build failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| TolaError::Transport {
                message: format!("smtp send failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(response.code().to_string())
    }
}

/// Transport used when `smtp.enabled = false`: logs the digest and reports
/// success so the rest of the pipeline behaves identically.
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> Result<String, TolaError> {
        info!(
            recipients = recipients.len(),
            %subject,
            body_bytes = html_body.len(),
            "smtp disabled, digest logged instead of sent"
        );
        Ok("logged".to_string())
    }
}
