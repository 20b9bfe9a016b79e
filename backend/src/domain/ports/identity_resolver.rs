//! Driving port that turns a presented bearer token into an identity.

use crate::domain::{Error, Identity};

/// Resolve the caller of an authenticated request.
///
/// Any token problem is reported as an unauthorized error; callers must not
/// run downstream logic when this fails.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Result<Identity, Error>;
}
