//! User aggregate and its validated value types.
//!
//! A user owns two reference lists: `projects` (ids of projects naming this
//! user as author) and `contacts` (ids of accepted friends). Both are mutated
//! through read-modify-write cycles guarded by [`User::revision`], which the
//! repositories compare and bump on every save.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::document_id::document_id;
use super::project::ProjectId;

document_id! {
    /// Store-assigned user identifier.
    UserId
}

/// Validation errors for user-facing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsernameTooShort { min } => {
                write!(f, "name must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "name must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "name may only contain letters, numbers, underscores or hyphens",
            ),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 15;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new("^[A-Za-z0-9_-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique login name, also shown as the author of projects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let length = name.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&name) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(name))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact address collected at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoded salted password hash (PHC string format).
///
/// `Debug` output is redacted so hashes never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a password hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded hash.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Attempted to add a contact that is already present.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Requested friend is already a contact")]
pub struct AlreadyContact;

/// Fields of a user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
}

/// Persisted user document.
///
/// ## Invariants
/// - `contacts` never holds the same id twice when mutated through
///   [`User::add_contact`].
/// - `revision` only changes inside a repository save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: Username,
    email: EmailAddress,
    password_hash: PasswordHash,
    projects: Vec<ProjectId>,
    contacts: Vec<UserId>,
    revision: u64,
}

impl User {
    /// Materialise a freshly inserted user with empty lists.
    pub fn new(id: UserId, fields: NewUser) -> Self {
        let NewUser {
            name,
            email,
            password_hash,
        } = fields;
        Self {
            id,
            name,
            email,
            password_hash,
            projects: Vec::new(),
            contacts: Vec::new(),
            revision: 0,
        }
    }

    /// Replace the project list, used when loading from a store.
    pub fn with_projects(mut self, projects: Vec<ProjectId>) -> Self {
        self.projects = projects;
        self
    }

    /// Replace the contact list, used when loading from a store.
    pub fn with_contacts(mut self, contacts: Vec<UserId>) -> Self {
        self.contacts = contacts;
        self
    }

    /// Set the stored revision, used when loading from a store.
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &Username {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Ids of projects authored by this user, in link order.
    pub fn projects(&self) -> &[ProjectId] {
        &self.projects
    }

    /// Ids of accepted friends, in link order.
    pub fn contacts(&self) -> &[UserId] {
        &self.contacts
    }

    /// Revision observed when this value was read.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append a project id to the author list.
    pub fn link_project(&mut self, project: ProjectId) {
        self.projects.push(project);
    }

    /// Keep every project id except `project`; returns how many were removed.
    pub fn unlink_project(&mut self, project: &ProjectId) -> usize {
        let before = self.projects.len();
        self.projects.retain(|linked| linked != project);
        before - self.projects.len()
    }

    pub fn has_contact(&self, friend: &UserId) -> bool {
        self.contacts.contains(friend)
    }

    /// Append `friend` to the contact list.
    ///
    /// Only this user's list changes; the friend's own contacts are left as
    /// they are.
    pub fn add_contact(&mut self, friend: UserId) -> Result<(), AlreadyContact> {
        if self.has_contact(&friend) {
            return Err(AlreadyContact);
        }
        self.contacts.push(friend);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
