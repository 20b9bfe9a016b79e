//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, password hasher, token service) are
//! implemented by outbound adapters. Driving ports (use-case traits) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod contacts_command;
mod identity_resolver;
mod login_service;
mod password_hasher;
mod project_repository;
mod projects_command;
mod projects_query;
mod token_service;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use contacts_command::MockContactsCommand;
pub use contacts_command::ContactsCommand;
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::IdentityResolver;
#[cfg(test)]
pub use login_service::{MockLoginService, MockRegistrationService};
pub use login_service::{LoginService, RegistrationService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{CredentialError, PasswordHasher};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectPersistenceError, ProjectRepository};
#[cfg(test)]
pub use projects_command::MockProjectsCommand;
pub use projects_command::{ProjectDeletion, ProjectsCommand};
#[cfg(test)]
pub use projects_query::MockProjectsQuery;
pub use projects_query::{AuthorProjects, ProjectsQuery};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
