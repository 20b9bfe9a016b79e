//! HS256 JSON Web Token adapter for the [`TokenService`] port.
//!
//! The signing secret is injected once at construction and never changes.
//! Expiry is checked against the injected clock rather than the system time
//! so issuance and validation agree on "now".

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessToken, Identity, UserId};

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Rejected signing secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenSecretError {
    /// The secret is shorter than [`MIN_SECRET_BYTES`].
    #[error("token secret must be at least {min} bytes, got {actual}")]
    TooShort {
        /// Required length.
        min: usize,
        /// Supplied length.
        actual: usize,
    },
}

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    id: String,
    name: String,
    iat: i64,
    exp: i64,
}

/// Signs and validates bearer tokens with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a service from a secret of at least [`MIN_SECRET_BYTES`].
    pub fn new(
        secret: Zeroizing<Vec<u8>>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenSecretError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenSecretError::TooShort {
                min: MIN_SECRET_BYTES,
                actual: secret.len(),
            });
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            ttl,
            clock,
        })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, identity: &Identity) -> Result<AccessToken, TokenError> {
        let now = self.clock.utc();
        let claims = Claims {
            id: identity.user_id().to_string(),
            name: identity.name().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::issue(err.to_string()))
    }

    fn validate(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation()).map_err(|err| {
            match err.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::malformed(err.to_string()),
            }
        })?;
        let claims = data.claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::Expired);
        }
        let user_id = UserId::new(&claims.id)
            .map_err(|err| TokenError::malformed(format!("id claim: {err}")))?;
        Ok(Identity::new(user_id, claims.name))
    }
}
