//! Driving ports for account use-cases: sign-up and log-in.
//!
//! Inbound adapters call these without knowing how passwords are hashed or
//! tokens are signed, which keeps handler tests free of persistence.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials, Registration, User};

/// Register new users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Hash the password and store a new user.
    ///
    /// An existing name yields a conflict error.
    async fn sign_up(&self, registration: &Registration) -> Result<User, Error>;
}

/// Exchange credentials for a bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify the password for `credentials.name()` and issue a token.
    ///
    /// An unknown name is not-found; a wrong password is an invalid request.
    /// Both carry the same public message.
    async fn log_in(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;
}
