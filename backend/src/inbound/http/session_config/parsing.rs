//! Toggle parsing shared by the session settings.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Boolean environment toggle with its debug-build default.
pub(super) struct Toggle {
    name: &'static str,
    default: bool,
}

impl Toggle {
    pub(super) const fn new(name: &'static str, default: bool) -> Self {
        Self { name, default }
    }

    pub(super) fn read<E: Env>(
        &self,
        env: &E,
        mode: BuildMode,
    ) -> Result<bool, SessionConfigError> {
        let label = if self.default { "enabled" } else { "disabled" };
        let Some(value) = env.string(self.name) else {
            return lenient(
                mode,
                self.default,
                SessionConfigError::MissingEnv { name: self.name },
                || warn!("{} not set; defaulting to {label}", self.name),
            );
        };
        match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => lenient(
                mode,
                self.default,
                SessionConfigError::InvalidEnv {
                    name: self.name,
                    value: value.clone(),
                    expected: BOOL_EXPECTED,
                },
                || warn!(value = %value, "invalid {}; defaulting to {label}", self.name),
            ),
        }
    }
}

/// Fall back with a warning in debug builds; fail in release builds.
pub(super) fn lenient<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    fallback: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => lenient(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            || warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it"),
        ),
        _ => lenient(
            mode,
            fallback,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: value.clone(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %value, "invalid SESSION_SAMESITE, using default"),
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
