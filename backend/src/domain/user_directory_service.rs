//! User directory service: user reads and friend links.
//!
//! Friend links are one-directional: only the requester's `contacts` list is
//! written. Writes go through [`UserRepository::save`], so two concurrent
//! additions against the same requester cannot both win; the loser gets a
//! conflict instead of a duplicated contact.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{ContactsCommand, UserPersistenceError, UserRepository, UsersQuery};
use crate::domain::query::{Field, Predicate};
use crate::domain::{Error, User, UserId};

const NO_USERS: &str = "No users found";
const UNKNOWN_USER: &str = "Requested user does not exist";
const ADD_FRIEND_FAILED: &str = "Unable to add the friend";
const ALREADY_CONTACT: &str = "Requested friend is already a contact";

const CONCURRENT_UPDATE: &str = "The user was modified concurrently; try again";

/// Map a lost compare-and-swap to a retryable conflict.
///
/// Both revisions stay in the diagnostic; callers only see the stable code.
pub(crate) fn revision_conflict(expected: u64, actual: u64) -> Error {
    Error::conflict(CONCURRENT_UPDATE)
        .with_details(json!({ "code": "concurrent_update" }))
        .with_diagnostic(format!(
            "revision mismatch: expected {expected}, found {actual}"
        ))
}

/// Service implementing the user read and contact driving ports.
#[derive(Clone)]
pub struct UserDirectoryService<U> {
    users: Arc<U>,
}

impl<U> UserDirectoryService<U> {
    /// Create a new service over the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn add_friend_failure(cause: impl std::fmt::Display) -> Error {
    Error::not_found(ADD_FRIEND_FAILED).with_diagnostic(format!("Error while adding friend: {cause}"))
}

impl<U: UserRepository> UserDirectoryService<U> {
    async fn load(&self, id: &UserId) -> Result<User, Error> {
        match self.users.find_by_id(id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(Error::not_found(UNKNOWN_USER).with_diagnostic(format!("no user {id}"))),
            Err(err) => Err(Error::not_found(UNKNOWN_USER).with_diagnostic(err.to_string())),
        }
    }

    async fn load_for_friendship(&self, id: &UserId) -> Result<User, Error> {
        match self.users.find_by_id(id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(add_friend_failure(format!("user {id} does not exist"))),
            Err(err) => Err(add_friend_failure(err)),
        }
    }
}

#[async_trait]
impl<U: UserRepository> UsersQuery for UserDirectoryService<U> {
    async fn list_users(&self, predicate: &Predicate) -> Result<Vec<User>, Error> {
        let users = self
            .users
            .find(predicate)
            .await
            .map_err(|err| Error::not_found(NO_USERS).with_diagnostic(err.to_string()))?;
        if users.is_empty() {
            return Err(Error::not_found(NO_USERS).with_diagnostic(NO_USERS));
        }
        Ok(users)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.load(id).await
    }

    async fn list_friends(&self, id: &UserId) -> Result<Vec<User>, Error> {
        let user = self.load(id).await?;
        if user.contacts().is_empty() {
            return Ok(Vec::new());
        }
        let predicate =
            Predicate::all().and_any_of(Field::Id, user.contacts().iter().map(UserId::to_string));
        self.users
            .find(&predicate)
            .await
            .map_err(|err| Error::not_found(UNKNOWN_USER).with_diagnostic(err.to_string()))
    }
}

#[async_trait]
impl<U: UserRepository> ContactsCommand for UserDirectoryService<U> {
    async fn add_friend(&self, requester: &UserId, friend: &UserId) -> Result<User, Error> {
        let mut client = self.load_for_friendship(requester).await?;
        let friend = self.load_for_friendship(friend).await?;

        client
            .add_contact(friend.id().clone())
            .map_err(|err| Error::conflict(ALREADY_CONTACT).with_diagnostic(err.to_string()))?;

        match self.users.save(&client).await {
            Ok(saved) => {
                debug!(
                    requester = %saved.id(),
                    friend = %friend.id(),
                    revision = saved.revision(),
                    "contact added"
                );
                Ok(friend)
            }
            Err(UserPersistenceError::RevisionMismatch { expected, actual }) => {
                Err(revision_conflict(expected, actual))
            }
            Err(err) => Err(add_friend_failure(err)),
        }
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
