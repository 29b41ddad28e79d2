//! Application settings loaded via OrthoConfig.
//!
//! Values come from `ROLEPLAY_*` environment variables, command-line flags
//! or a configuration file. Session cookie toggles are read separately by
//! [`crate::inbound::http::session_config`].

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAIL_FROM: &str = "no-reply@roleplay.com";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROLEPLAY")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Sender address for recovery mail.
    pub mail_from: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Socket address built from [`Self::host`] and [`Self::port`].
    ///
    /// # Errors
    ///
    /// Returns [`std::net::AddrParseError`] when the host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host(), self.port()).parse()
    }

    /// Non-blank database URL, if configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn mail_from(&self) -> &str {
        self.mail_from.as_deref().unwrap_or(DEFAULT_MAIL_FROM)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "ROLEPLAY_HOST",
        "ROLEPLAY_PORT",
        "ROLEPLAY_DATABASE_URL",
        "ROLEPLAY_MAIL_FROM",
        "ROLEPLAY_DB_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.host(), "0.0.0.0");
        assert_eq!(settings.port(), 8080);
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.mail_from(), "no-reply@roleplay.com");
        assert_eq!(settings.db_max_connections(), 10);
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("socket address")
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ROLEPLAY_HOST", Some("127.0.0.1".to_owned())),
            ("ROLEPLAY_PORT", Some("9090".to_owned())),
            (
                "ROLEPLAY_DATABASE_URL",
                Some("postgres://roleplay@localhost/roleplay".to_owned()),
            ),
            ("ROLEPLAY_MAIL_FROM", Some("keeper@example.com".to_owned())),
            ("ROLEPLAY_DB_MAX_CONNECTIONS", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("socket address")
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://roleplay@localhost/roleplay")
        );
        assert_eq!(settings.mail_from(), "keeper@example.com");
        assert_eq!(settings.db_max_connections(), 4);
    }

    #[rstest]
    fn blank_database_url_selects_memory_store() {
        let _guard = lock_env([("ROLEPLAY_DATABASE_URL", Some("  ".to_owned()))]);

        assert_eq!(load_from_empty_args().database_url(), None);
    }
}
