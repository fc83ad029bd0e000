//! Tests for user field validation.

use super::*;
use rstest::rstest;

#[rstest]
#[case("cook@example.com", "cook@example.com")]
#[case("  Cook@Example.COM ", "Cook@example.com")]
fn email_normalises_domain(#[case] raw: &str, #[case] expected: &str) {
    let email = Email::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("not-an-email", UserValidationError::InvalidEmail)]
#[case("two@@example.com", UserValidationError::InvalidEmail)]
#[case("spaces in@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(raw).expect_err("invalid email"), expected);
}

#[rstest]
fn email_rejects_overlong_addresses() {
    let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
    assert_eq!(
        Email::new(raw).expect_err("too long"),
        UserValidationError::EmailTooLong { max: EMAIL_MAX }
    );
}

#[rstest]
#[case("chef")]
#[case("chef.de_partie+1@home-2")]
#[case("повар")]
fn username_accepts_word_characters(#[case] raw: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), raw);
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("has space", UserValidationError::UsernameInvalidCharacters)]
#[case("semi;colon", UserValidationError::UsernameInvalidCharacters)]
fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw).expect_err("invalid username"), expected);
}

#[rstest]
fn username_enforces_length() {
    let raw = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw).expect_err("too long"),
        UserValidationError::UsernameTooLong { max: USERNAME_MAX }
    );
}

#[rstest]
fn person_name_reports_field() {
    let err = PersonName::new("last_name", "   ").expect_err("blank name");
    assert_eq!(err, UserValidationError::EmptyName { field: "last_name" });
    assert_eq!(err.field(), "last_name");
}

#[rstest]
fn registration_validates_every_field() {
    let registration =
        UserRegistration::try_from_parts("cook@example.com", "cook", "Julia", "Child")
            .expect("valid registration");
    assert_eq!(registration.username.as_ref(), "cook");
    assert_eq!(registration.first_name.as_ref(), "Julia");

    let err = UserRegistration::try_from_parts("cook@example.com", "cook", "Julia", "")
        .expect_err("missing last name");
    assert_eq!(err.field(), "last_name");
}

#[rstest]
fn user_id_serialises_as_number() {
    let value = serde_json::to_value(UserId::new(7)).expect("serialise");
    assert_eq!(value, serde_json::json!(7));
}
