//! Driving port for friend links.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsCommand: Send + Sync {
    /// Add `friend` to `requester`'s contacts and return the friend.
    ///
    /// Adding an existing contact is a conflict. Only the requester's list
    /// changes.
    async fn add_friend(&self, requester: &UserId, friend: &UserId) -> Result<User, Error>;
}
