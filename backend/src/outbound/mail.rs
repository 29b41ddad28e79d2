//! [`Mailer`] adapter that records outgoing mail as structured log events.
//!
//! Message bodies carry single-use reset links, so only the envelope is
//! logged.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{MailMessage, Mailer, MailerError};

/// Mailer that logs each message instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        info!(
            to = %message.to,
            from = %message.from,
            subject = %message.subject,
            body_bytes = message.html.len(),
            "mail dispatched"
        );
        Ok(())
    }
}
