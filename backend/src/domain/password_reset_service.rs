//! Password recovery services.
//!
//! Issuing a token never reveals whether the address belongs to an account.
//! Redeeming checks existence, then expiry, then hands the new hash to the
//! repository, which repeats both checks inside the atomic unit that swaps
//! the password and deletes the token.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    IssueTokenRequest, MailMessage, Mailer, PasswordHasher, PasswordResetCommand,
    PasswordResetRepository, RedeemOutcome, ResetPasswordRequest, UserRepository,
};
use crate::domain::user_account_service::map_user_repository_error;
use crate::domain::{Error, PasswordResetToken, ResetToken, User};

/// Subject line of recovery mail.
pub const RECOVERY_SUBJECT: &str = "Roleplay: Password Recovery";

fn token_not_found() -> Error {
    Error::not_found("token not found")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Build the link mailed to the user.
fn reset_link(base: &str, token: &ResetToken) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}token={}", token.as_str())
}

fn recovery_body(user: &User, link: &str) -> String {
    let username = escape_html(user.username().as_ref());
    let link = escape_html(link);
    format!(
        "<p>Hello {username},</p>\
         <p>We received a request to reset your Roleplay password. \
         The link below is valid for two hours and can be used once.</p>\
         <p><a href=\"{link}\">{link}</a></p>\
         <p>If you did not ask for this, you can ignore this message.</p>"
    )
}

/// Recovery service implementing [`PasswordResetCommand`].
#[derive(Clone)]
pub struct PasswordResetService<T, U, H, M> {
    tokens: Arc<T>,
    users: Arc<U>,
    hasher: Arc<H>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
    mail_from: String,
}

impl<T, U, H, M> PasswordResetService<T, U, H, M> {
    /// Create a new service. `mail_from` is the sender of recovery mail.
    pub fn new(
        tokens: Arc<T>,
        users: Arc<U>,
        hasher: Arc<H>,
        mailer: Arc<M>,
        clock: Arc<dyn Clock>,
        mail_from: impl Into<String>,
    ) -> Self {
        Self {
            tokens,
            users,
            hasher,
            mailer,
            clock,
            mail_from: mail_from.into(),
        }
    }
}

#[async_trait]
impl<T, U, H, M> PasswordResetCommand for PasswordResetService<T, U, H, M>
where
    T: PasswordResetRepository,
    U: UserRepository,
    H: PasswordHasher,
    M: Mailer,
{
    async fn issue_token(&self, request: IssueTokenRequest) -> Result<(), Error> {
        let IssueTokenRequest {
            email,
            reset_password_url,
        } = request;
        let base = reset_password_url.trim();
        if base.is_empty() {
            return Err(Error::invalid_request("resetPasswordUrl must not be empty"));
        }

        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)?
        else {
            debug!("password recovery requested for an unknown address");
            return Ok(());
        };

        let record = PasswordResetToken::new(ResetToken::generate(), *user.id(), self.clock.utc());
        self.tokens
            .insert(&record)
            .await
            .map_err(Error::from)?;

        let link = reset_link(base, record.token());
        let message = MailMessage {
            to: user.email().clone(),
            from: self.mail_from.clone(),
            subject: RECOVERY_SUBJECT.to_owned(),
            html: recovery_body(&user, &link),
        };
        self.mailer.send(&message).await.map_err(|err| {
            warn!(user_id = %user.id(), error = %err, "recovery mail not sent");
            Error::service_unavailable("recovery mail could not be sent")
        })?;
        info!(user_id = %user.id(), "password reset token issued");
        Ok(())
    }

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), Error> {
        let ResetPasswordRequest { token, password } = request;
        let now = self.clock.utc();

        let record = self
            .tokens
            .find(&token)
            .await
            .map_err(Error::from)?
            .ok_or_else(token_not_found)?;
        if record.is_expired_at(now) {
            return Err(Error::token_expired());
        }

        let hash = self
            .hasher
            .hash(&password)
            .await
            .map_err(Error::from)?;
        match self
            .tokens
            .redeem(&token, now, hash)
            .await
            .map_err(Error::from)?
        {
            RedeemOutcome::Redeemed(user_id) => {
                info!(user_id = %user_id, "password reset");
                Ok(())
            }
            RedeemOutcome::Missing => Err(token_not_found()),
            RedeemOutcome::Expired => Err(Error::token_expired()),
        }
    }
}

#[cfg(test)]
#[path = "password_reset_service_tests.rs"]
mod tests;
