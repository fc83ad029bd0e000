//! Account services: registration, profiles, password changes, avatars and
//! token authentication.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::error_mapping::{field_error, password_policy_error};
use crate::domain::ports::{
    ChangePasswordRequest, MediaStore, NewUserRecord, PasswordHasher, RegisterUserRequest,
    SubscriptionRepository, TokenAuth, TokenRepository, UserAccounts, UserRepository,
};
use crate::domain::{
    AuthToken, Email, Error, ImageUpload, LoginCredentials, MediaPath, NewPassword, TokenDigest,
    User, UserId, UserProfile, UserRegistration, UserSeed, subscribed_authors,
};

const BAD_CREDENTIALS: &str = "unable to log in with provided credentials";

pub(crate) fn page_not_found() -> Error {
    Error::not_found("invalid page")
}

/// Account management service implementing [`UserAccounts`].
#[derive(Clone)]
pub struct UserAccountsService<U, S> {
    users: Arc<U>,
    subscriptions: Arc<S>,
    hasher: Arc<dyn PasswordHasher>,
    media: Arc<dyn MediaStore>,
}

impl<U, S> UserAccountsService<U, S> {
    pub fn new(
        users: Arc<U>,
        subscriptions: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            users,
            subscriptions,
            hasher,
            media,
        }
    }
}

impl<U, S> UserAccountsService<U, S>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    async fn existing_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn create_account(
        &self,
        registration: UserRegistration,
        password: &str,
    ) -> Result<User, Error> {
        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .create(&NewUserRecord {
                registration,
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Register every seed whose email is not taken yet and return how many
    /// accounts were created. Seed fields are validated like sign-ups but
    /// the password policy does not apply.
    pub async fn seed_users(&self, seeds: Vec<UserSeed>) -> Result<usize, Error> {
        let mut created = 0;
        for seed in seeds {
            let registration = UserRegistration::try_from_parts(
                &seed.email,
                &seed.username,
                &seed.first_name,
                &seed.last_name,
            )?;
            if self
                .users
                .find_credentials(registration.email.as_ref())
                .await?
                .is_some()
            {
                continue;
            }
            let password = Zeroizing::new(seed.password);
            self.create_account(registration, &password).await?;
            created += 1;
        }
        Ok(created)
    }
}

#[async_trait]
impl<U, S> UserAccounts for UserAccountsService<U, S>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let RegisterUserRequest {
            registration,
            password,
        } = request;
        let password = NewPassword::new(&password, &registration.username, &registration.email)
            .map_err(|err| password_policy_error("password", err))?;
        self.create_account(registration, password.expose()).await
    }

    async fn users(&self, page: PageRequest) -> Result<Page<User>, Error> {
        let total = self.users.count().await?;
        page.ensure_in_range(total).map_err(|_| page_not_found())?;
        let users = self.users.list(page.offset(), page.limit()).await?;
        Ok(Page::new(users, total, page))
    }

    async fn profile(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error> {
        let user = self.existing_user(id).await?;
        let followed = subscribed_authors(self.subscriptions.as_ref(), viewer, &[id]).await?;
        Ok(UserProfile {
            is_subscribed: followed.contains(&id),
            user,
        })
    }

    async fn change_password(
        &self,
        user: UserId,
        request: ChangePasswordRequest,
    ) -> Result<(), Error> {
        let account = self.existing_user(user).await?;
        let stored = self
            .users
            .find_credentials(account.email.as_ref())
            .await?
            .ok_or_else(|| Error::not_found(format!("user {user} not found")))?;
        if !self
            .hasher
            .verify(&request.current_password, &stored.password_hash)?
        {
            return Err(field_error(
                "current_password",
                "invalid_password",
                "current password is incorrect",
            ));
        }
        let password = NewPassword::new(&request.new_password, &account.username, &account.email)
            .map_err(|err| password_policy_error("new_password", err))?;
        let hash = self.hasher.hash(password.expose())?;
        self.users.update_password(user, &hash).await?;
        info!(user_id = %user, "password changed");
        Ok(())
    }

    async fn set_avatar(&self, user: UserId, image: ImageUpload) -> Result<MediaPath, Error> {
        let account = self.existing_user(user).await?;
        let path = MediaPath::for_avatar(account.id, &account.username, image.format());
        self.media.save(&path, image.bytes()).await?;
        if let Some(previous) = account.avatar.filter(|previous| *previous != path) {
            if let Err(err) = self.media.delete(&previous).await {
                warn!(user_id = %user, path = %previous, error = %err, "stale avatar not removed");
            }
        }
        self.users.update_avatar(user, Some(path.clone())).await?;
        info!(user_id = %user, path = %path, "avatar updated");
        Ok(path)
    }

    async fn clear_avatar(&self, user: UserId) -> Result<(), Error> {
        let account = self.existing_user(user).await?;
        if let Some(path) = account.avatar {
            self.media.delete(&path).await?;
            self.users.update_avatar(user, None).await?;
            info!(user_id = %user, "avatar removed");
        }
        Ok(())
    }
}

/// Token login service implementing [`TokenAuth`].
#[derive(Clone)]
pub struct TokenAuthService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U, T> TokenAuthService<U, T> {
    pub fn new(users: Arc<U>, tokens: Arc<T>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }
}

#[async_trait]
impl<U, T> TokenAuth for TokenAuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error> {
        let Ok(email) = Email::new(credentials.email()) else {
            return Err(Error::invalid_request(BAD_CREDENTIALS));
        };
        let Some(stored) = self.users.find_credentials(email.as_ref()).await? else {
            return Err(Error::invalid_request(BAD_CREDENTIALS));
        };
        if !self
            .hasher
            .verify(credentials.password(), &stored.password_hash)?
        {
            return Err(Error::invalid_request(BAD_CREDENTIALS));
        }

        let token = AuthToken::generate();
        self.tokens.store(stored.user.id, &token.digest()).await?;
        info!(user_id = %stored.user.id, "token issued");
        Ok(token)
    }

    async fn logout(&self, user: UserId, token: &TokenDigest) -> Result<(), Error> {
        self.tokens.revoke(token).await?;
        info!(user_id = %user, "token revoked");
        Ok(())
    }

    async fn authenticate(&self, key: &str) -> Result<UserId, Error> {
        self.tokens
            .find_user(&TokenDigest::of(key))
            .await?
            .ok_or_else(|| Error::unauthorized("invalid token"))
    }
}

#[cfg(test)]
mod tests;
