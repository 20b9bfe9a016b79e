//! Tests for the user aggregate and its value types.

use super::*;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};

const ALICE_ID: &str = "6390b1cd5c3c4b2a9e5d7f10";
const BOB_ID: &str = "6390b1cd5c3c4b2a9e5d7f11";

fn project_id(raw: &str) -> ProjectId {
    ProjectId::new(raw).expect("valid project id")
}

#[fixture]
fn alice() -> User {
    User::new(
        UserId::new(ALICE_ID).expect("valid id"),
        NewUser {
            name: Username::new("alice").expect("valid name"),
            email: EmailAddress::new("alice@example.com").expect("valid email"),
            password_hash: PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
        },
    )
}

#[fixture]
fn bob_id() -> UserId {
    UserId::new(BOB_ID).expect("valid id")
}

#[rstest]
#[case("abc")]
#[case("alice_99")]
#[case("a-b-c-d-e-f-g-h")]
fn username_accepts_boundaries_and_allowed_characters(#[case] raw: &str) {
    let name = Username::new(raw).expect("valid username");
    assert_eq!(name.as_str(), raw);
}

#[rstest]
#[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
#[case("abcdefghijklmnop", UserValidationError::UsernameTooLong { max: USERNAME_MAX })]
#[case("bad name", UserValidationError::UsernameInvalidCharacters)]
#[case("bad$char", UserValidationError::UsernameInvalidCharacters)]
fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw).expect_err("invalid username"), expected);
}

#[rstest]
#[case("not-an-email")]
#[case("missing@tld")]
#[case("two@@example.com")]
#[case("")]
fn email_rejects_malformed_addresses(#[case] raw: &str) {
    assert_eq!(
        EmailAddress::new(raw).expect_err("invalid email"),
        UserValidationError::InvalidEmail
    );
}

#[rstest]
fn email_is_trimmed() {
    let email = EmailAddress::new("  bob@example.com ").expect("valid email");
    assert_eq!(email.as_str(), "bob@example.com");
}

#[rstest]
fn password_hash_debug_is_redacted(alice: User) {
    let rendered = format!("{alice:?}");
    assert!(!rendered.contains("argon2id"));
    assert!(rendered.contains("PasswordHash(..)"));
}

#[rstest]
fn new_user_starts_with_empty_lists(alice: User) {
    assert!(alice.projects().is_empty());
    assert!(alice.contacts().is_empty());
    assert_eq!(alice.revision(), 0);
}

#[rstest]
fn unlink_project_removes_every_occurrence(mut alice: User) {
    let kept = project_id("p-kept");
    let gone = project_id("p-gone");
    alice.link_project(gone.clone());
    alice.link_project(kept.clone());
    alice.link_project(gone.clone());

    let removed = alice.unlink_project(&gone);

    assert_eq!(removed, 2);
    assert_eq!(alice.projects(), std::slice::from_ref(&kept));
}

#[rstest]
fn unlink_missing_project_is_a_no_op(mut alice: User) {
    alice.link_project(project_id("p-1"));
    assert_eq!(alice.unlink_project(&project_id("p-2")), 0);
    assert_eq!(alice.projects().len(), 1);
}

#[given("a user without contacts")]
fn a_user_without_contacts(alice: User) -> User {
    alice
}

#[derive(Debug, Clone)]
struct ContactOutcome {
    user: User,
    first: Result<(), AlreadyContact>,
    second: Result<(), AlreadyContact>,
}

#[when("the same friend is added twice")]
fn the_same_friend_is_added_twice(mut user: User, friend: UserId) -> ContactOutcome {
    let first = user.add_contact(friend.clone());
    let second = user.add_contact(friend);
    ContactOutcome {
        user,
        first,
        second,
    }
}

#[then("the second addition is rejected and the friend is listed once")]
fn the_second_addition_is_rejected(outcome: ContactOutcome, friend: UserId) {
    assert!(outcome.first.is_ok());
    assert_eq!(outcome.second, Err(AlreadyContact));
    assert_eq!(
        outcome
            .user
            .contacts()
            .iter()
            .filter(|id| **id == friend)
            .count(),
        1
    );
}

#[rstest]
fn adding_a_friend_twice_is_rejected(alice: User, bob_id: UserId) {
    let user = a_user_without_contacts(alice);
    let outcome = the_same_friend_is_added_twice(user, bob_id.clone());
    the_second_addition_is_rejected(outcome, bob_id);
}

#[rstest]
fn with_builders_restore_stored_state(alice: User, bob_id: UserId) {
    let restored = alice
        .with_projects(vec![project_id("p-1")])
        .with_contacts(vec![bob_id.clone()])
        .with_revision(7);
    assert_eq!(restored.revision(), 7);
    assert!(restored.has_contact(&bob_id));
    assert_eq!(restored.projects(), [project_id("p-1")].as_slice());
}
