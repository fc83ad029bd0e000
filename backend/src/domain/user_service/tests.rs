//! Tests for the account and token services.

use std::sync::Arc;

use rstest::{fixture, rstest};
use zeroize::Zeroizing;

use super::*;
use crate::domain::ports::{
    MockMediaStore, MockPasswordHasher, MockSubscriptionRepository, MockTokenRepository,
    MockUserRepository, StoredCredentials, UserRepositoryError,
};
use crate::domain::{ErrorCode, PasswordHash, PersonName, UserRegistration, Username};

#[fixture]
fn cook() -> User {
    User {
        id: UserId::new(5),
        email: Email::new("cook@example.com").expect("valid email"),
        username: Username::new("cook").expect("valid username"),
        first_name: PersonName::new("first_name", "Julia").expect("valid name"),
        last_name: PersonName::new("last_name", "Child").expect("valid name"),
        avatar: None,
    }
}

fn hasher_accepting(password: &'static str) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .returning(move |candidate, _| Ok(candidate == password));
    hasher
        .expect_hash()
        .returning(|raw| Ok(PasswordHash::new(format!("hashed:{raw}"))));
    hasher
}

fn accounts(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
) -> UserAccountsService<MockUserRepository, MockSubscriptionRepository> {
    UserAccountsService::new(
        Arc::new(users),
        Arc::new(MockSubscriptionRepository::new()),
        Arc::new(hasher),
        Arc::new(MockMediaStore::new()),
    )
}

fn registration(password: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        registration: UserRegistration::try_from_parts(
            "cook@example.com",
            "cook",
            "Julia",
            "Child",
        )
        .expect("valid registration"),
        password: Zeroizing::new(password.to_owned()),
    }
}

#[rstest]
#[tokio::test]
async fn register_stores_hashed_password(cook: User) {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .withf(|record| record.password_hash.as_ref() == "hashed:tarte tatin")
        .times(1)
        .return_once(move |_| Ok(cook));

    let service = accounts(users, hasher_accepting("unused"));
    let user = service
        .register(registration("tarte tatin"))
        .await
        .expect("registration succeeds");
    assert_eq!(user.id, UserId::new(5));
}

#[rstest]
#[tokio::test]
async fn register_rejects_weak_password_before_storage() {
    let mut users = MockUserRepository::new();
    users.expect_create().never();

    let service = accounts(users, hasher_accepting("unused"));
    let error = service
        .register(registration("12345678"))
        .await
        .expect_err("numeric password rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|details| details.get("field")),
        Some(&serde_json::json!("password"))
    );
}

#[rstest]
#[tokio::test]
async fn register_surfaces_duplicate_email() {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .return_once(|_| Err(UserRepositoryError::duplicate_email()));

    let service = accounts(users, hasher_accepting("unused"));
    let error = service
        .register(registration("tarte tatin"))
        .await
        .expect_err("duplicate rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn change_password_checks_current_password(cook: User) {
    let mut users = MockUserRepository::new();
    let account = cook.clone();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(account)));
    users.expect_find_credentials().return_once(move |_| {
        Ok(Some(StoredCredentials {
            user: cook,
            password_hash: PasswordHash::new("stored"),
        }))
    });
    users.expect_update_password().never();

    let service = accounts(users, hasher_accepting("right one"));
    let error = service
        .change_password(
            UserId::new(5),
            ChangePasswordRequest {
                current_password: Zeroizing::new("wrong one".to_owned()),
                new_password: Zeroizing::new("brand new pass".to_owned()),
            },
        )
        .await
        .expect_err("wrong current password");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn users_page_past_the_end_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_count().return_once(|| Ok(3));
    users.expect_list().never();

    let service = accounts(users, hasher_accepting("unused"));
    let page = PageRequest::new(2, 6).expect("valid page");
    let error = service.users(page).await.expect_err("out of range");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn profile_of_missing_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));

    let service = accounts(users, hasher_accepting("unused"));
    let error = service
        .profile(None, UserId::new(99))
        .await
        .expect_err("missing user");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

fn token_service(
    users: MockUserRepository,
    tokens: MockTokenRepository,
) -> TokenAuthService<MockUserRepository, MockTokenRepository> {
    TokenAuthService::new(
        Arc::new(users),
        Arc::new(tokens),
        Arc::new(hasher_accepting("sourdough")),
    )
}

#[rstest]
#[tokio::test]
async fn login_stores_the_token_digest(cook: User) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials()
        .withf(|email| email == "cook@example.com")
        .return_once(move |_| {
            Ok(Some(StoredCredentials {
                user: cook,
                password_hash: PasswordHash::new("stored"),
            }))
        });
    let mut tokens = MockTokenRepository::new();
    tokens
        .expect_store()
        .withf(|user, digest| *user == UserId::new(5) && digest.as_ref().len() == 64)
        .times(1)
        .return_once(|_, _| Ok(()));

    let credentials =
        LoginCredentials::try_from_parts("cook@EXAMPLE.com", "sourdough").expect("credentials");
    let token = token_service(users, tokens)
        .login(&credentials)
        .await
        .expect("login succeeds");
    assert_eq!(token.key().len(), 40);
}

#[rstest]
#[case("cook@example.com", "rye")]
#[case("nobody@example.com", "sourdough")]
#[case("not an email", "sourdough")]
#[tokio::test]
async fn login_rejects_bad_credentials(cook: User, #[case] email: &str, #[case] password: &str) {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().returning(move |email| {
        Ok((email == "cook@example.com").then(|| StoredCredentials {
            user: cook.clone(),
            password_hash: PasswordHash::new("stored"),
        }))
    });
    let mut tokens = MockTokenRepository::new();
    tokens.expect_store().never();

    let credentials = LoginCredentials::try_from_parts(email, password).expect("credentials");
    let error = token_service(users, tokens)
        .login(&credentials)
        .await
        .expect_err("login fails");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), BAD_CREDENTIALS);
}

#[rstest]
#[tokio::test]
async fn logout_revokes_only_the_presented_digest() {
    let presented = TokenDigest::of("first-device");
    let expected = presented.clone();
    let mut tokens = MockTokenRepository::new();
    tokens
        .expect_revoke()
        .withf(move |digest| *digest == expected)
        .times(1)
        .return_once(|_| Ok(()));

    token_service(MockUserRepository::new(), tokens)
        .logout(UserId::new(5), &presented)
        .await
        .expect("logout succeeds");
}

#[rstest]
#[tokio::test]
async fn authenticate_rejects_unknown_keys() {
    let mut tokens = MockTokenRepository::new();
    tokens.expect_find_user().return_once(|_| Ok(None));

    let error = token_service(MockUserRepository::new(), tokens)
        .authenticate("deadbeef")
        .await
        .expect_err("unknown token");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn authenticate_maps_outages_to_service_unavailable() {
    let mut tokens = MockTokenRepository::new();
    tokens
        .expect_find_user()
        .return_once(|_| Err(crate::domain::ports::TokenRepositoryError::connection("down")));

    let error = token_service(MockUserRepository::new(), tokens)
        .authenticate("deadbeef")
        .await
        .expect_err("outage");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn seed_users_skips_existing_emails(cook: User) {
    let mut users = MockUserRepository::new();
    let existing = cook.clone();
    users
        .expect_find_credentials()
        .withf(|email| email == "cook@example.com")
        .return_once(move |_| {
            Ok(Some(StoredCredentials {
                user: existing,
                password_hash: PasswordHash::new("stored"),
            }))
        });
    users
        .expect_find_credentials()
        .withf(|email| email == "baker@example.com")
        .return_once(|_| Ok(None));
    users
        .expect_create()
        .withf(|record| record.registration.username.as_ref() == "baker")
        .times(1)
        .return_once(move |_| Ok(cook));

    let seed = |email: &str, username: &str| UserSeed {
        email: email.to_owned(),
        username: username.to_owned(),
        first_name: "Test".to_owned(),
        last_name: "Cook".to_owned(),
        password: "tarte tatin".to_owned(),
    };
    let service = accounts(users, hasher_accepting("unused"));
    let created = service
        .seed_users(vec![
            seed("cook@example.com", "cook"),
            seed("baker@example.com", "baker"),
        ])
        .await
        .expect("seeding succeeds");
    assert_eq!(created, 1);
}

#[rstest]
#[tokio::test]
async fn seed_users_accept_passwords_sign_up_would_refuse(cook: User) {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().return_once(|_| Ok(None));
    users
        .expect_create()
        .withf(|record| record.password_hash.as_ref() == "hashed:12345678")
        .times(1)
        .return_once(move |_| Ok(cook));

    let service = accounts(users, hasher_accepting("unused"));
    let created = service
        .seed_users(vec![UserSeed {
            email: "cook@example.com".to_owned(),
            username: "cook".to_owned(),
            first_name: "Julia".to_owned(),
            last_name: "Child".to_owned(),
            password: "12345678".to_owned(),
        }])
        .await
        .expect("seeding succeeds");
    assert_eq!(created, 1);
}
