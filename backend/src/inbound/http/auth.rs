//! Bearer-token extraction for authenticated handlers.
//!
//! Handlers that mutate state take an [`AuthenticatedUser`] argument. The
//! extractor reads `Authorization: Bearer <token>`, asks the
//! [`IdentityResolver`](crate::domain::ports::IdentityResolver) port for the
//! caller and rejects the request before the handler body runs when either
//! step fails.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, Identity};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, resolved from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    /// Borrow the resolved identity.
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

/// Pull the raw token out of an `Authorization` header value.
fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Invalid token"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("Invalid token"))
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| {
            Error::internal("Internal server error").with_diagnostic("HTTP state not registered")
        })?;
    let token = bearer_token(req)?;
    state.identity.resolve(token).map(AuthenticatedUser)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::state_with;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, get, test as actix_test};
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};

    #[get("/whoami")]
    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.identity().name().to_owned())
    }

    #[rstest]
    #[case::valid(Some("Bearer token-for-alice"), StatusCode::OK)]
    #[case::missing(None, StatusCode::UNAUTHORIZED)]
    #[case::wrong_scheme(Some("Basic token-for-alice"), StatusCode::UNAUTHORIZED)]
    #[case::empty(Some("Bearer "), StatusCode::UNAUTHORIZED)]
    #[case::forged(Some("Bearer forged"), StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn extractor_gates_on_bearer_token(
        #[case] header: Option<&str>,
        #[case] expected: StatusCode,
    ) {
        let state = state_with(|_| {});
        let app = actix_test::init_service(App::new().app_data(state).service(whoami)).await;

        let mut request = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let response = actix_test::call_service(&app, request.to_request()).await;

        assert_eq!(response.status(), expected);
    }

    #[given("a request without an authorization header")]
    fn a_request_without_an_authorization_header() -> HttpRequest {
        actix_test::TestRequest::get().uri("/whoami").to_http_request()
    }

    #[when("the bearer token is read")]
    fn the_bearer_token_is_read(req: HttpRequest) -> Result<String, Error> {
        bearer_token(&req).map(str::to_owned)
    }

    #[then("the caller is told the token is missing")]
    fn the_caller_is_told_the_token_is_missing(result: Result<String, Error>) {
        let err = result.expect_err("no header");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Missing bearer token");
    }

    #[rstest]
    fn missing_header_is_unauthorized() {
        let req = a_request_without_an_authorization_header();
        let result = the_bearer_token_is_read(req);
        the_caller_is_told_the_token_is_missing(result);
    }
}
