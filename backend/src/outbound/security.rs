//! Argon2id implementation of the [`PasswordHasher`] port.
//!
//! Hashes are stored as PHC strings so the parameters travel with each hash.
//! Hashing and verification are CPU bound and run on the blocking pool.

use argon2::password_hash::{self, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use rand::rngs::OsRng;
use tokio::task;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{Password, PasswordHash};

/// Argon2id hasher with configurable cost parameters.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Use the crate's recommended Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use explicit cost parameters, e.g. cheaper ones in tests.
    #[must_use]
    pub const fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn engine(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

fn join_error(error: task::JoinError) -> PasswordHasherError {
    PasswordHasherError::hashing(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let params = self.params.clone();
        let plain = password.clone();
        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::engine(params)
                .hash_password(plain.expose().as_bytes(), &salt)
                .map(|hash| PasswordHash::new(hash.to_string()))
                .map_err(|error| PasswordHasherError::hashing(error.to_string()))
        })
        .await
        .map_err(join_error)?
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let params = self.params.clone();
        let plain = zeroize::Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        task::spawn_blocking(move || {
            let parsed = password_hash::PasswordHash::new(&encoded)
                .map_err(|error| PasswordHasherError::hashing(error.to_string()))?;
            match Self::engine(params).verify_password(plain.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(error) => Err(PasswordHasherError::hashing(error.to_string())),
            }
        })
        .await
        .map_err(join_error)?
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        let params = Params::new(256, 1, 1, None).expect("valid params");
        Argon2PasswordHasher::with_params(params)
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_verify_against_the_original(hasher: Argon2PasswordHasher) {
        let password = Password::new("correct horse").expect("password");
        let hash = hasher.hash(&password).await.expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong horse", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn salts_differ_between_hashes(hasher: Argon2PasswordHasher) {
        let password = Password::new("secret").expect("password");
        let first = hasher.hash(&password).await.expect("hash");
        let second = hasher.hash(&password).await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hashes_are_errors(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify("secret", &PasswordHash::new("not-a-phc-string".to_owned()))
            .await
            .expect_err("malformed hash");
        assert!(matches!(err, PasswordHasherError::Hashing { .. }));
    }
}
