//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::query::Predicate;
use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A user with the same name already exists.
        Duplicate { name: String } => "user `{name}` already exists",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u64, actual: u64 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The user disappeared between read and write.
        Missing { id: String } => "user {id} no longer exists",
    }
}

/// Port for user document storage.
///
/// # Revision semantics
///
/// - Inserted users start at revision 0.
/// - [`UserRepository::save`] replaces the stored document only when its
///   revision equals [`User::revision`] of the argument, and stores it with
///   the revision incremented by one. The stored value is returned.
/// - A stale argument yields [`UserPersistenceError::RevisionMismatch`]; a
///   missing document yields [`UserPersistenceError::Missing`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; the store assigns the identifier.
    ///
    /// Names are unique: a clash yields [`UserPersistenceError::Duplicate`].
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch every user matching `predicate`, in insertion order.
    async fn find(&self, predicate: &Predicate) -> Result<Vec<User>, UserPersistenceError>;

    /// Compare-and-swap the whole document on its revision.
    async fn save(&self, user: &User) -> Result<User, UserPersistenceError>;
}
