//! User identity model.
//!
//! Users own groups, join them, and own password reset tokens. Each value
//! type validates on construction so services only ever see well-formed
//! identities.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::{Host, Url};

use super::identifier::uuid_identifier;

/// Maximum length of a username in characters.
pub const USERNAME_MAX: usize = 64;

/// Validation errors raised by user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier is not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username is blank.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username is longer than [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Accepted maximum.
        max: usize,
    },
    /// The email address is not of the form `local@domain.tld`.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// The avatar is not an absolute http(s) URL with a resolvable host.
    #[error("avatar must be a valid http or https URL")]
    InvalidAvatar,
}

uuid_identifier!(
    /// Stable user identifier.
    UserId
);

impl UserId {
    /// Parse an identifier from its textual UUID form.
    ///
    /// # Errors
    /// Returns [`UserValidationError::InvalidId`] when `id` is not a UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        id.as_ref()
            .parse()
            .map_err(|_| UserValidationError::InvalidId)
    }
}

/// Public handle shown to other players.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate a username, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`UserValidationError::EmptyUsername`] or
    /// [`UserValidationError::UsernameTooLong`].
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Every domain label is non-empty and the final label has at least two letters.
        let pattern = concat!(
            r"^[A-Za-z0-9._%+\-]+@",
            r"(?:[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
        );
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address used to sign in and to receive recovery mail.
///
/// Stored lower-cased so uniqueness is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Errors
    /// Returns [`UserValidationError::InvalidEmail`] for malformed input.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::EmailAddress;
    ///
    /// assert!(EmailAddress::new("Player@Example.com").is_ok());
    /// assert!(EmailAddress::new("notvalid@c.").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Link to a user's avatar image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Validate an avatar link.
    ///
    /// # Errors
    /// Returns [`UserValidationError::InvalidAvatar`] unless `value` is an
    /// absolute http(s) URL whose host is an IP address or a dotted domain
    /// ending in an alphabetic label of two or more letters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = value.as_ref().trim();
        let url = Url::parse(raw).map_err(|_| UserValidationError::InvalidAvatar)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(UserValidationError::InvalidAvatar);
        }
        let host_ok = match url.host() {
            Some(Host::Domain(domain)) => has_top_level_label(domain),
            Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
            None => false,
        };
        if !host_ok {
            return Err(UserValidationError::InvalidAvatar);
        }
        Ok(Self(raw.to_owned()))
    }
}

fn has_top_level_label(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    let all_present = labels.iter().all(|label| !label.is_empty());
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    labels.len() >= 2 && all_present && tld_ok
}

impl AsRef<str> for AvatarUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<AvatarUrl> for String {
    fn from(value: AvatarUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for AvatarUrl {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered user as seen by the rest of the domain.
///
/// Password material never travels on this type; see
/// [`crate::domain::PasswordHash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    avatar: Option<AvatarUrl>,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub const fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        avatar: Option<AvatarUrl>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            avatar,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Public handle.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Sign-in and recovery address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Optional avatar link.
    #[must_use]
    pub const fn avatar(&self) -> Option<&AvatarUrl> {
        self.avatar.as_ref()
    }

    /// Replace the provided profile fields, keeping the rest.
    #[must_use]
    pub fn with_profile(self, email: Option<EmailAddress>, avatar: Option<AvatarUrl>) -> Self {
        Self {
            email: email.unwrap_or(self.email),
            avatar: avatar.or(self.avatar),
            ..self
        }
    }
}

#[cfg(test)]
mod tests;
