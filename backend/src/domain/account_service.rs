//! Account domain service: sign-up, log-in and bearer identity resolution.
//!
//! Implements the [`RegistrationService`], [`LoginService`] and
//! [`IdentityResolver`] driving ports on top of the user repository, the
//! password hasher and the token service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    IdentityResolver, LoginService, PasswordHasher, RegistrationService,
    TokenError, TokenService, UserPersistenceError, UserRepository,
};
use crate::domain::query::{Field, Predicate};
use crate::domain::{
    AccessToken, Error, Identity, LoginCredentials, NewUser, Registration, User,
};

const SIGN_UP_FAILED: &str = "User did not provide email, name or password";
const USER_EXISTS: &str = "User already exists";
const INVALID_LOGIN: &str = "Invalid username or password";
const INVALID_TOKEN: &str = "Invalid token";

/// Account service implementing the credential-related driving ports.
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> AccountService<U, H, T> {
    /// Create a new service over the given collaborators.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

fn sign_up_failure(cause: impl std::fmt::Display) -> Error {
    Error::invalid_request(SIGN_UP_FAILED).with_diagnostic(cause.to_string())
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, UserPersistenceError> {
        let predicate = Predicate::all().and_equals(Field::Name, name);
        Ok(self.users.find(&predicate).await?.into_iter().next())
    }
}

#[async_trait]
impl<U, H, T> RegistrationService for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn sign_up(&self, registration: &Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(sign_up_failure)?;

        let name = registration.name();
        if self
            .find_by_name(name.as_str())
            .await
            .map_err(sign_up_failure)?
            .is_some()
        {
            return Err(Error::conflict(USER_EXISTS).with_diagnostic(format!(
                "sign-up rejected: `{name}` is taken"
            )));
        }

        let new_user = NewUser {
            name: name.clone(),
            email: registration.email().clone(),
            password_hash,
        };
        match self.users.insert(&new_user).await {
            Ok(user) => {
                debug!(user_id = %user.id(), "user registered");
                Ok(user)
            }
            Err(err @ UserPersistenceError::Duplicate { .. }) => {
                Err(Error::conflict(USER_EXISTS).with_diagnostic(err.to_string()))
            }
            Err(err) => Err(sign_up_failure(err)),
        }
    }
}

#[async_trait]
impl<U, H, T> LoginService for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn log_in(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let user = match self.find_by_name(credentials.name()).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return Err(Error::not_found(INVALID_LOGIN).with_diagnostic("User not found"));
            }
            Err(err) => {
                return Err(Error::not_found(INVALID_LOGIN)
                    .with_diagnostic(format!("User not found: {err}")));
            }
        };

        let verified = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await;
        match verified {
            Ok(true) => {}
            Ok(false) => {
                return Err(Error::invalid_request(INVALID_LOGIN).with_diagnostic("Invalid password"));
            }
            Err(err) => {
                return Err(Error::invalid_request(INVALID_LOGIN)
                    .with_diagnostic(format!("Invalid password: {err}")));
            }
        }

        let identity = Identity::new(user.id().clone(), user.name().as_str());
        self.tokens
            .issue(&identity)
            .map_err(|err| Error::internal("Unable to issue a token").with_diagnostic(err.to_string()))
    }
}

impl<U, H, T> IdentityResolver for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    fn resolve(&self, token: &str) -> Result<Identity, Error> {
        self.tokens.validate(token).map_err(|err| {
            let message = match &err {
                TokenError::Expired => "Token expired",
                TokenError::Malformed { .. }
                | TokenError::SignatureMismatch
                | TokenError::Issue { .. } => INVALID_TOKEN,
            };
            Error::unauthorized(message).with_diagnostic(err.to_string())
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
