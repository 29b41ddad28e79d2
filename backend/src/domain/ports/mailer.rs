//! Port for outbound mail.

use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail adapters.
    pub enum MailerError {
        /// The message could not be handed over for delivery.
        Delivery { message: String } => "mail delivery failed: {message}",
    }
}

/// Rendered message ready for delivery.
#[derive(Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Recipient address.
    pub to: EmailAddress,
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

impl std::fmt::Debug for MailMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Bodies carry single-use links.
        f.debug_struct("MailMessage")
            .field("to", &self.to)
            .field("from", &self.from)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Hands messages to a delivery mechanism.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message.
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError>;
}
