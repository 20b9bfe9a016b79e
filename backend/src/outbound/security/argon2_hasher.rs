//! Argon2id adapter for the [`PasswordHasher`] port.
//!
//! Hashing is deliberately slow, so both operations run on the blocking pool
//! instead of stalling an async worker thread.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialError, PasswordHasher};

/// Argon2id with the crate's default parameters, PHC-encoded output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

fn hash_blocking(plaintext: &str) -> Result<PasswordHash, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|err| CredentialError::backend(err.to_string()))
}

fn verify_blocking(plaintext: &str, encoded: &str) -> Result<bool, CredentialError> {
    let parsed = password_hash::PasswordHash::new(encoded)
        .map_err(|err| CredentialError::invalid_input(format!("stored hash: {err}")))?;
    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialError> {
        if plaintext.is_empty() {
            return Err(CredentialError::invalid_input("password must not be empty"));
        }
        let plaintext = Zeroizing::new(plaintext.to_owned());
        tokio::task::spawn_blocking(move || hash_blocking(&plaintext))
            .await
            .map_err(|err| CredentialError::backend(err.to_string()))?
    }

    async fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, CredentialError> {
        if plaintext.is_empty() {
            return Err(CredentialError::invalid_input("password must not be empty"));
        }
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let encoded = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&plaintext, &encoded))
            .await
            .map_err(|err| CredentialError::backend(err.to_string()))?
    }
}
