//! Tests for the account service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    CredentialError, MockPasswordHasher, MockTokenService, MockUserRepository,
};
use crate::domain::test_fixtures::{user, user_id};
use crate::domain::PasswordHash;
use rstest::rstest;

type Service = AccountService<MockUserRepository, MockPasswordHasher, MockTokenService>;

fn make_service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenService,
) -> Service {
    AccountService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
}

fn registration() -> Registration {
    Registration::try_from_parts("alice", "alice@example.com", "hunter22").expect("valid")
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("alice", password).expect("valid")
}

fn hashing_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok(PasswordHash::new("$argon2id$fresh")));
    hasher
}

#[tokio::test]
async fn sign_up_stores_hashed_password() {
    let mut users = MockUserRepository::new();
    users.expect_find().times(1).return_once(|_| Ok(Vec::new()));
    users
        .expect_insert()
        .withf(|new_user| {
            new_user.name.as_str() == "alice" && new_user.password_hash.as_str() == "$argon2id$fresh"
        })
        .times(1)
        .return_once(|new_user| Ok(User::new(user_id("user-1"), new_user.clone())));

    let service = make_service(users, hashing_hasher(), MockTokenService::new());
    let created = service.sign_up(&registration()).await.expect("sign-up succeeds");

    assert_eq!(created.id().as_str(), "user-1");
    assert_ne!(created.password_hash().as_str(), "hunter22");
}

#[tokio::test]
async fn sign_up_rejects_existing_name() {
    let mut users = MockUserRepository::new();
    users
        .expect_find()
        .times(1)
        .return_once(|_| Ok(vec![user("user-1", "alice")]));
    users.expect_insert().never();

    let service = make_service(users, hashing_hasher(), MockTokenService::new());
    let err = service.sign_up(&registration()).await.expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "User already exists");
}

#[tokio::test]
async fn sign_up_maps_duplicate_insert_race_to_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find().times(1).return_once(|_| Ok(Vec::new()));
    users
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate("alice")));

    let service = make_service(users, hashing_hasher(), MockTokenService::new());
    let err = service.sign_up(&registration()).await.expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn sign_up_store_failure_is_invalid_request_with_diagnostic() {
    let mut users = MockUserRepository::new();
    users
        .expect_find()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("refused")));

    let service = make_service(users, hashing_hasher(), MockTokenService::new());
    let err = service.sign_up(&registration()).await.expect_err("failure");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(err.diagnostic().is_some_and(|d| d.contains("refused")));
    assert!(!err.message().contains("refused"));
}

#[tokio::test]
async fn log_in_unknown_name_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find().times(1).return_once(|_| Ok(Vec::new()));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().never();

    let service = make_service(users, hasher, MockTokenService::new());
    let err = service
        .log_in(&credentials("hunter22"))
        .await
        .expect_err("unknown user");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Invalid username or password");
    assert_eq!(err.diagnostic(), Some("User not found"));
}

#[rstest]
#[case::mismatch(Ok(false))]
#[case::malformed_hash(Err(CredentialError::invalid_input("not a PHC string")))]
#[tokio::test]
async fn log_in_bad_password_is_invalid_request(#[case] outcome: Result<bool, CredentialError>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find()
        .times(1)
        .return_once(|_| Ok(vec![user("user-1", "alice")]));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(1).return_once(move |_, _| outcome);
    let mut tokens = MockTokenService::new();
    tokens.expect_issue().never();

    let service = make_service(users, hasher, tokens);
    let err = service
        .log_in(&credentials("wrong"))
        .await
        .expect_err("bad password");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Invalid username or password");
}

#[tokio::test]
async fn log_in_issues_token_for_matching_user() {
    let mut users = MockUserRepository::new();
    users
        .expect_find()
        .withf(|predicate| *predicate == Predicate::all().and_equals(Field::Name, "alice"))
        .times(1)
        .return_once(|_| Ok(vec![user("user-1", "alice")]));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(1).return_once(|_, _| Ok(true));
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .withf(|identity| identity.user_id().as_str() == "user-1" && identity.name() == "alice")
        .times(1)
        .return_once(|_| Ok(AccessToken::new("signed")));

    let service = make_service(users, hasher, tokens);
    let token = service
        .log_in(&credentials("hunter22"))
        .await
        .expect("login succeeds");

    assert_eq!(token.as_str(), "signed");
}

#[rstest]
#[case::expired(TokenError::expired(), "Token expired")]
#[case::forged(TokenError::signature_mismatch(), "Invalid token")]
#[case::garbage(TokenError::malformed("bad base64"), "Invalid token")]
fn resolve_maps_token_errors_to_unauthorized(
    #[case] failure: TokenError,
    #[case] expected_message: &str,
) {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_validate()
        .times(1)
        .return_once(move |_| Err(failure));

    let service = make_service(MockUserRepository::new(), MockPasswordHasher::new(), tokens);
    let err = service.resolve("token").expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), expected_message);
}

#[rstest]
fn resolve_returns_identity_from_valid_token() {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_validate()
        .times(1)
        .return_once(|_| Ok(Identity::new(user_id("user-1"), "alice")));

    let service = make_service(MockUserRepository::new(), MockPasswordHasher::new(), tokens);
    let identity = service.resolve("token").expect("valid token");

    assert_eq!(identity.user_id().as_str(), "user-1");
}
