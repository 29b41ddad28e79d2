//! Test doubles shared by unit and behaviour tests.
//!
//! Compiled for `cfg(test)` and for the `test-support` feature that the
//! integration tests enable.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{MailMessage, Mailer, MailerError};
use crate::outbound::security::Argon2PasswordHasher;

/// Clock frozen at an instant until advanced.
#[derive(Debug)]
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
}

impl MutableClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Mailer keeping every message for later inspection.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Token carried by the most recent recovery link, if any.
    pub fn last_token(&self) -> Option<String> {
        let sent = self.sent();
        let html = &sent.last()?.html;
        let start = html.find("token=")? + "token=".len();
        let token: String = html
            .get(start..)?
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .collect();
        (!token.is_empty()).then_some(token)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}

/// Argon2id hasher with minimal cost parameters.
#[must_use]
pub fn fast_hasher() -> Argon2PasswordHasher {
    match argon2::Params::new(256, 1, 1, None) {
        Ok(params) => Argon2PasswordHasher::with_params(params),
        Err(_) => Argon2PasswordHasher::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use chrono::TimeZone;

    #[tokio::test]
    async fn recording_mailer_extracts_the_token() {
        let mailer = RecordingMailer::default();
        mailer
            .send(&MailMessage {
                to: EmailAddress::new("ada@example.com").expect("email"),
                from: "no-reply@roleplay.com".into(),
                subject: "Roleplay: Password Recovery".into(),
                html: "<a href=\"https://app/reset?token=abc123\">link</a>".into(),
            })
            .await
            .expect("send");

        assert_eq!(mailer.last_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn mutable_clock_advances() {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("timestamp");
        let clock = MutableClock::new(start);

        clock.advance(TimeDelta::hours(2));

        assert_eq!(clock.utc(), start + TimeDelta::hours(2));
    }
}
