//! Users API handlers.
//!
//! ```text
//! POST  /api/v1/users/sign-up      {"name":"alice","email":"a@b.io","password":"pw"}
//! POST  /api/v1/users/log-in       {"name":"alice","password":"pw"}
//! GET   /api/v1/users/all?username=alice
//! GET   /api/v1/users/{userId}?friends=all
//! PATCH /api/v1/users/{friendId}   (bearer token)
//! ```

use std::collections::HashMap;

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::query::user_predicate;
use crate::domain::{
    CredentialsValidationError, Error, LoginCredentials, Registration, User, UserId,
    UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const SIGN_UP_FAILED: &str = "User did not provide email, name or password";
const USER_MISSING: &str = "Requested user does not exist";

/// Sign-up request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct SignUpRequest {
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub password: String,
}

/// Log-in request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LogInRequest {
    #[schema(example = "alice")]
    pub name: String,
    pub password: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    #[schema(example = "6390b1cd5c3c4b2a9e5d7f10")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub projects: Vec<String>,
    pub contacts: Vec<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            projects: user.projects().iter().map(ToString::to_string).collect(),
            contacts: user.contacts().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Query parameters for `GET /users/{userId}`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserDataQuery {
    /// `all` returns the user's contacts instead of the user.
    friends: Option<String>,
}

fn field_of(err: &CredentialsValidationError) -> (&'static str, &'static str) {
    match err {
        CredentialsValidationError::EmptyUsername => ("name", "empty_name"),
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialsValidationError::InvalidUser(UserValidationError::InvalidEmail) => {
            ("email", "invalid_email")
        }
        CredentialsValidationError::InvalidUser(_) => ("name", "invalid_name"),
    }
}

fn map_credentials_error(message: &str, err: CredentialsValidationError) -> Error {
    let (field, code) = field_of(&err);
    Error::invalid_request(message)
        .with_details(json!({ "field": field, "code": code }))
        .with_diagnostic(err.to_string())
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw)
        .map_err(|err| Error::not_found(USER_MISSING).with_diagnostic(err.to_string()))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User created; body is `{ newUser }`", body = UserResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signUp",
    security([])
)]
#[post("/users/sign-up")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let SignUpRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&name, &email, &password)
        .map_err(|err| map_credentials_error(SIGN_UP_FAILED, err))?;
    let user = state.registration.sign_up(&registration).await?;
    Ok(HttpResponse::Created().json(json!({ "newUser": UserResponse::from(&user) })))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/users/log-in",
    request_body = LogInRequest,
    responses(
        (status = 200, description = "Token issued; body is `{ token }`"),
        (status = 400, description = "Invalid username or password", body = ErrorSchema),
        (status = 404, description = "Invalid username or password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "logIn",
    security([])
)]
#[post("/users/log-in")]
pub async fn log_in(
    state: web::Data<HttpState>,
    payload: web::Json<LogInRequest>,
) -> ApiResult<HttpResponse> {
    let LogInRequest { name, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&name, &password)
        .map_err(|err| map_credentials_error("Invalid username or password", err))?;
    let token = state.login.log_in(&credentials).await?;
    Ok(HttpResponse::Ok().json(json!({ "token": token.into_inner() })))
}

/// List users, optionally filtered by exact name.
#[utoipa::path(
    get,
    path = "/api/v1/users/all",
    params(("username" = Option<String>, Query, description = "Exact user name to match")),
    responses(
        (status = 200, description = "Users; body is `{ users }`", body = [UserResponse]),
        (status = 404, description = "No users found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users/all")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let predicate = user_predicate(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let users = state.users.list_users(&predicate).await?;
    let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

/// Fetch one user, or their contacts with `friends=all`.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    params(
        ("userId" = String, Path, description = "User identifier"),
        UserDataQuery
    ),
    responses(
        (status = 200, description = "`{ user }` or `{ userFriends }`", body = UserResponse),
        (status = 404, description = "Requested user does not exist", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserData",
    security([])
)]
#[get("/users/{user_id}")]
pub async fn get_user_data(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<UserDataQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    if query.friends.as_deref() == Some("all") {
        let friends = state.users.list_friends(&id).await?;
        let friends: Vec<UserResponse> = friends.iter().map(UserResponse::from).collect();
        return Ok(HttpResponse::Ok().json(json!({ "userFriends": friends })));
    }
    let user = state.users.get_user(&id).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": UserResponse::from(&user) })))
}

/// Add `friendId` to the caller's contacts.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{friendId}",
    params(("friendId" = String, Path, description = "User to add as a contact")),
    responses(
        (status = 200, description = "Friend added; body is `{ friendAdded: name }`"),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Unable to add the friend", body = ErrorSchema),
        (status = 409, description = "Already a contact, or a concurrent update won", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "addFriend",
    security(("bearerAuth" = []))
)]
#[patch("/users/{friend_id}")]
pub async fn add_friend(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let friend_id = UserId::new(path.as_str()).map_err(|err| {
        Error::not_found("Unable to add the friend").with_diagnostic(err.to_string())
    })?;
    let friend = state
        .contacts
        .add_friend(caller.identity().user_id(), &friend_id)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "friendAdded": friend.name().as_str() })))
}
