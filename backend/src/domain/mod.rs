//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, plus the services that keep users and projects consistent.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - User / Project — the two stored aggregates and their value types.
//! - LoginCredentials / Registration / Identity — credential flow types.
//! - query — predicate model shared by read paths and document stores.
//! - AccountService / UserDirectoryService / ProjectService — driving port
//!   implementations.

pub mod account_service;
pub mod auth;
pub(crate) mod document_id;
pub mod error;
pub mod ports;
pub mod project;
pub mod project_service;
pub mod query;
pub mod trace_id;
pub mod user;
pub mod user_directory_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::account_service::AccountService;
pub use self::auth::{
    AccessToken, CredentialsValidationError, Identity, LoginCredentials, Registration,
};
pub use self::document_id::DocumentIdError;
pub use self::error::{Error, ErrorCode};
pub use self::project::{Project, ProjectDraft, ProjectFields, ProjectId, ProjectValidationError};
pub use self::project_service::ProjectService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AlreadyContact, EmailAddress, NewUser, PasswordHash, User, UserId, UserValidationError,
    Username,
};
pub use self::user_directory_service::UserDirectoryService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use showcase::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("Invalid token"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
