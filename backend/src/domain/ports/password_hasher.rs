//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum CredentialError {
        /// Empty password or an unparsable stored hash.
        InvalidInput { message: String } => "invalid credential input: {message}",
        /// The hashing backend itself failed.
        Backend { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, slow, one-way password transform.
///
/// Two hashes of the same password differ. Verification never errors on a
/// mismatch; it returns `false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` with a fresh random salt.
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialError>;

    /// Check `plaintext` against a stored hash.
    async fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, CredentialError>;
}
