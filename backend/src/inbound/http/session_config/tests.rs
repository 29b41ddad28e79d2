//! Unit tests for session settings.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use uuid::Uuid;

struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    fn with_len(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("roleplay-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write key file");
        Self { path }
    }

    fn path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for KeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[derive(Default)]
struct Vars(HashMap<&'static str, String>);

impl Vars {
    fn set(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    fn unset(mut self, name: &'static str) -> Self {
        self.0.remove(name);
        self
    }

    fn env(self) -> MockEnv {
        let vars = self.0;
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }
}

#[fixture]
fn key_file() -> KeyFile {
    KeyFile::with_len(SESSION_KEY_MIN_LEN)
}

fn release_vars(key_file: &KeyFile) -> Vars {
    Vars::default()
        .set(KEY_FILE_ENV, key_file.path())
        .set("SESSION_COOKIE_SECURE", "1")
        .set(SAMESITE_ENV, "Strict")
        .set("SESSION_ALLOW_EPHEMERAL", "0")
}

#[rstest]
fn release_accepts_complete_settings(key_file: KeyFile) {
    let env = release_vars(&key_file).env();

    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("complete settings are valid");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case::cookie_secure("SESSION_COOKIE_SECURE")]
#[case::same_site("SESSION_SAMESITE")]
#[case::allow_ephemeral("SESSION_ALLOW_EPHEMERAL")]
fn release_requires_every_toggle(key_file: KeyFile, #[case] name: &'static str) {
    let env = release_vars(&key_file).unset(name).env();

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("missing toggle is rejected");

    assert!(matches!(err, SessionConfigError::MissingEnv { name: missing } if missing == name));
}

#[rstest]
#[case::cookie_secure("SESSION_COOKIE_SECURE", "maybe")]
#[case::same_site("SESSION_SAMESITE", "sometimes")]
#[case::allow_ephemeral("SESSION_ALLOW_EPHEMERAL", "")]
fn release_rejects_malformed_toggles(
    key_file: KeyFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let env = release_vars(&key_file).set(name, value).env();

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("malformed toggle is rejected");

    assert!(matches!(err, SessionConfigError::InvalidEnv { name: bad, .. } if bad == name));
}

#[rstest]
fn release_rejects_ephemeral_keys(key_file: KeyFile) {
    let env = release_vars(&key_file)
        .set("SESSION_ALLOW_EPHEMERAL", "yes")
        .env();

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("ephemeral keys are refused");

    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_insecure_same_site_none(key_file: KeyFile) {
    let env = release_vars(&key_file)
        .set("SESSION_COOKIE_SECURE", "0")
        .set(SAMESITE_ENV, "None")
        .env();

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("SameSite=None needs a secure cookie");

    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_unreadable_key(key_file: KeyFile) {
    let missing = std::env::temp_dir().join(format!("absent-{}", Uuid::new_v4()));
    let env = release_vars(&key_file)
        .set(KEY_FILE_ENV, missing.to_string_lossy())
        .env();

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("missing key file is rejected");

    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_short_key() {
    let short = KeyFile::with_len(32);
    let env = release_vars(&short).env();

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("short key is rejected");

    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: 32, min_len: SESSION_KEY_MIN_LEN, .. }
    ));
}

#[rstest]
fn debug_tolerates_an_empty_environment() {
    let env = Vars::default()
        .set(KEY_FILE_ENV, "/nonexistent/roleplay/session_key")
        .env();

    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug falls back to defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_falls_back_on_malformed_same_site(key_file: KeyFile) {
    let env = release_vars(&key_file).set(SAMESITE_ENV, "unexpected").env();

    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug falls back to defaults");

    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_replaces_a_short_key() {
    let short = KeyFile::with_len(8);
    let env = release_vars(&short).env();

    assert!(session_settings_from_env(&env, BuildMode::Debug).is_ok());
}
