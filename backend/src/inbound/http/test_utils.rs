//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockContactsCommand, MockIdentityResolver, MockLoginService, MockProjectsCommand,
    MockProjectsQuery, MockRegistrationService, MockUsersQuery,
};
use crate::domain::test_fixtures::user_id;
use crate::domain::Identity;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

pub const ALICE_ID: &str = "6390b1cd5c3c4b2a9e5d7f10";
pub const TOKEN: &str = "token-for-alice";

pub fn alice_identity() -> Identity {
    Identity::new(user_id(ALICE_ID), "alice")
}

/// Resolver that accepts [`TOKEN`] as alice and nothing else.
pub fn alice_resolver() -> MockIdentityResolver {
    let mut resolver = MockIdentityResolver::new();
    resolver.expect_resolve().returning(|token| {
        if token == TOKEN {
            Ok(alice_identity())
        } else {
            Err(crate::domain::Error::unauthorized("Invalid token"))
        }
    });
    resolver
}

/// Build handler state from expectation-free mocks, letting the caller swap
/// in the ports a test exercises. Unconfigured mocks panic when called.
pub fn state_with(configure: impl FnOnce(&mut HttpStatePorts)) -> web::Data<HttpState> {
    let mut ports = HttpStatePorts {
        registration: Arc::new(MockRegistrationService::new()),
        login: Arc::new(MockLoginService::new()),
        identity: Arc::new(alice_resolver()),
        users: Arc::new(MockUsersQuery::new()),
        contacts: Arc::new(MockContactsCommand::new()),
        projects: Arc::new(MockProjectsQuery::new()),
        projects_command: Arc::new(MockProjectsCommand::new()),
    };
    configure(&mut ports);
    web::Data::new(HttpState::new(ports))
}

/// `Authorization` header carrying [`TOKEN`].
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {TOKEN}"))
}
