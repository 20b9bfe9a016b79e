//! Port for issuing and validating signed bearer tokens.
//!
//! Tokens are stateless: nothing is stored server-side, and the expiry is
//! embedded at issuance. Signing and verification are CPU-only, so the trait
//! is synchronous.

use crate::domain::{AccessToken, Identity};

use super::define_port_error;

define_port_error! {
    /// Reasons a token was rejected or could not be produced.
    pub enum TokenError {
        /// Not a structurally valid token, or the claims do not parse.
        Malformed { message: String } => "malformed token: {message}",
        /// The embedded expiry has passed.
        Expired => "token expired",
        /// The signature does not match the configured secret.
        SignatureMismatch => "token signature mismatch",
        /// Encoding a new token failed.
        Issue { message: String } => "token could not be issued: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying `identity` and an expiry.
    fn issue(&self, identity: &Identity) -> Result<AccessToken, TokenError>;

    /// Verify signature and expiry, then recover the identity.
    fn validate(&self, token: &str) -> Result<Identity, TokenError>;
}
