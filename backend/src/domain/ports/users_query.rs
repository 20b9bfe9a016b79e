//! Driving port for user-facing reads.

use async_trait::async_trait;

use crate::domain::query::Predicate;
use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Users matching `predicate`. An empty result is a not-found error.
    async fn list_users(&self, predicate: &Predicate) -> Result<Vec<User>, Error>;

    /// A single user by id.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// The users listed in `id`'s contacts.
    async fn list_friends(&self, id: &UserId) -> Result<Vec<User>, Error>;
}
