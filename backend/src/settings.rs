//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SHOWCASE_*` environment variables and an
//! optional configuration file, merged in that order of precedence.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE: &str = "showcase";
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
const EPHEMERAL_SECRET_BYTES: usize = 32;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// No signing secret was configured and ephemeral secrets are disabled.
    #[error("SHOWCASE_JWT_SECRET is not set and ephemeral secrets are not allowed")]
    MissingSecret,
    /// The token lifetime does not fit a signed duration.
    #[error("token lifetime of {0} seconds is out of range")]
    TokenTtlOutOfRange(u64),
}

/// Settings controlling the HTTP listener, document store and tokens.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHOWCASE")]
pub struct ShowcaseSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// MongoDB connection string. Unset selects the in-memory store.
    pub mongodb_uri: Option<String>,
    /// MongoDB database name.
    pub mongodb_database: Option<String>,
    /// Token signing secret, at least 32 bytes.
    pub jwt_secret: Option<String>,
    /// Token lifetime in seconds.
    pub token_ttl_secs: Option<u64>,
    /// Permit a generated signing secret when none is configured.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
}

impl ShowcaseSettings {
    /// Return the listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Return the configured database name, falling back to `showcase`.
    #[must_use]
    pub fn mongodb_database(&self) -> &str {
        self.mongodb_database.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    /// Return the token lifetime.
    pub fn token_ttl(&self) -> Result<chrono::Duration, SettingsError> {
        let secs = self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or(SettingsError::TokenTtlOutOfRange(secs))
    }

    /// Return the signing secret.
    ///
    /// Debug builds, or `allow_ephemeral_secret`, fall back to a random
    /// secret that lives for the process lifetime.
    pub fn signing_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        resolve_secret(
            self.jwt_secret.as_deref(),
            self.allow_ephemeral_secret || cfg!(debug_assertions),
        )
    }
}

fn resolve_secret(
    configured: Option<&str>,
    allow_ephemeral: bool,
) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
    match configured {
        Some(secret) => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
        None if allow_ephemeral => {
            warn!("using an ephemeral token secret; issued tokens die with the process");
            let mut bytes = Zeroizing::new([0_u8; EPHEMERAL_SECRET_BYTES]);
            rand::thread_rng().fill_bytes(bytes.as_mut_slice());
            Ok(Zeroizing::new(hex::encode(bytes.as_slice()).into_bytes()))
        }
        None => Err(SettingsError::MissingSecret),
    }
}
