//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ContactsCommand, IdentityResolver, LoginService, ProjectsCommand, ProjectsQuery,
    RegistrationService, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub identity: Arc<dyn IdentityResolver>,
    pub users: Arc<dyn UsersQuery>,
    pub contacts: Arc<dyn ContactsCommand>,
    pub projects: Arc<dyn ProjectsQuery>,
    pub projects_command: Arc<dyn ProjectsCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub identity: Arc<dyn IdentityResolver>,
    pub users: Arc<dyn UsersQuery>,
    pub contacts: Arc<dyn ContactsCommand>,
    pub projects: Arc<dyn ProjectsQuery>,
    pub projects_command: Arc<dyn ProjectsCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use showcase::domain::{AccountService, ProjectService, UserDirectoryService};
    /// use showcase::inbound::http::state::{HttpState, HttpStatePorts};
    /// use showcase::outbound::persistence::MemoryStore;
    /// use showcase::outbound::security::{Argon2PasswordHasher, JwtTokenService};
    /// use zeroize::Zeroizing;
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let tokens = JwtTokenService::new(
    ///     Zeroizing::new(vec![7_u8; 32]),
    ///     chrono::Duration::hours(1),
    ///     Arc::new(DefaultClock),
    /// )
    /// .expect("secret long enough");
    /// let accounts = Arc::new(AccountService::new(
    ///     store.clone(),
    ///     Arc::new(Argon2PasswordHasher),
    ///     Arc::new(tokens),
    /// ));
    /// let directory = Arc::new(UserDirectoryService::new(store.clone()));
    /// let projects = Arc::new(ProjectService::new(store.clone(), store));
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     registration: accounts.clone(),
    ///     login: accounts.clone(),
    ///     identity: accounts,
    ///     users: directory.clone(),
    ///     contacts: directory,
    ///     projects: projects.clone(),
    ///     projects_command: projects,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            registration,
            login,
            identity,
            users,
            contacts,
            projects,
            projects_command,
        } = ports;
        Self {
            registration,
            login,
            identity,
            users,
            contacts,
            projects,
            projects_command,
        }
    }
}
