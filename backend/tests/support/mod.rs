//! Shared helpers for HTTP integration tests.
//!
//! Every request goes through the production app builder, so routing order,
//! the trace middleware and error mapping are exercised exactly as served.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};
use showcase::domain::TRACE_ID_HEADER;
use showcase::domain::ports::{ProjectRepository, UserRepository};
use showcase::inbound::http::health::HealthState;
use showcase::inbound::http::state::HttpState;
use showcase::outbound::persistence::MemoryStore;
use showcase::outbound::security::JwtTokenService;
use zeroize::Zeroizing;

#[expect(
    dead_code,
    reason = "server include exposes the listener constructor unused in tests"
)]
#[path = "../../src/server/mod.rs"]
mod server;

pub const REACT: &str = "react";

/// Captured response.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub trace_id: Option<String>,
}

/// Handler state over `store` with a fixed signing secret.
pub fn state_over<S>(store: Arc<S>) -> web::Data<HttpState>
where
    S: UserRepository + ProjectRepository + 'static,
{
    let tokens = JwtTokenService::new(
        Zeroizing::new(b"integration-test-signing-secret-0123".to_vec()),
        chrono::Duration::hours(1),
        Arc::new(DefaultClock),
    )
    .expect("secret long enough");
    server::state_builders::build_http_state(store, Arc::new(tokens))
}

/// Handler state over a fresh in-memory store.
pub fn memory_state() -> web::Data<HttpState> {
    state_over(Arc::new(MemoryStore::new()))
}

/// Send `request` through the full application.
pub async fn send(state: &web::Data<HttpState>, request: actix_test::TestRequest) -> Reply {
    let app = actix_test::init_service(server::build_app(
        web::Data::new(HealthState::new()),
        state.clone(),
    ))
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        body,
        trace_id,
    }
}

/// Register `name` and return the new user's id.
pub async fn register(state: &web::Data<HttpState>, name: &str) -> String {
    let reply = send(
        state,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/sign-up")
            .set_json(json!({
                "name": name,
                "email": format!("{name}@example.com"),
                "password": format!("{name}-password"),
            })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "sign-up: {}", reply.body);
    reply.body["newUser"]["_id"]
        .as_str()
        .expect("new user id")
        .to_owned()
}

/// Log `name` in with the password [`register`] chose and return the token.
pub async fn log_in(state: &web::Data<HttpState>, name: &str) -> String {
    let reply = send(
        state,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/log-in")
            .set_json(json!({ "name": name, "password": format!("{name}-password") })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "log-in: {}", reply.body);
    reply.body["token"].as_str().expect("token").to_owned()
}

/// Project payload authored by `author`.
pub fn project_payload(name: &str, author: &str, author_id: &str, technology: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "repository": format!("https://github.com/{author}/{name}"),
        "author": author,
        "authorId": author_id,
        "technologies": [technology],
    })
}

/// Create a project and return the raw reply.
pub async fn create_project(state: &web::Data<HttpState>, token: &str, payload: &Value) -> Reply {
    send(
        state,
        actix_test::TestRequest::post()
            .uri("/api/v1/projects/new")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(payload),
    )
    .await
}

/// Fetch a user document.
pub async fn fetch_user(state: &web::Data<HttpState>, id: &str) -> Value {
    let reply = send(
        state,
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/{id}")),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "user lookup: {}", reply.body);
    reply.body["user"].clone()
}
