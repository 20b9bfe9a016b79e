//! Builders wiring a document store and token service into HTTP state.

use std::sync::Arc;

use actix_web::web;

use showcase::domain::ports::{ProjectRepository, TokenService, UserRepository};
use showcase::domain::{AccountService, ProjectService, UserDirectoryService};
use showcase::inbound::http::state::{HttpState, HttpStatePorts};
use showcase::outbound::security::Argon2PasswordHasher;

/// Build handler state over a single document store.
///
/// The store backs both collections, so the same adapter serves the user
/// and project repositories. Production passes the MongoDB store; local runs
/// and integration tests pass the in-memory one.
pub fn build_http_state<S, T>(store: Arc<S>, tokens: Arc<T>) -> web::Data<HttpState>
where
    S: UserRepository + ProjectRepository + 'static,
    T: TokenService + 'static,
{
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&store),
        Arc::new(Argon2PasswordHasher),
        tokens,
    ));
    let directory = Arc::new(UserDirectoryService::new(Arc::clone(&store)));
    let projects = Arc::new(ProjectService::new(Arc::clone(&store), store));

    web::Data::new(HttpState::new(HttpStatePorts {
        registration: accounts.clone(),
        login: accounts.clone(),
        identity: accounts,
        users: directory.clone(),
        contacts: directory,
        projects: projects.clone(),
        projects_command: projects,
    }))
}
