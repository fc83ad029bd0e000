//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{MediaPath, PasswordHash, User, UserId, UserRegistration};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail => "a user with this email already exists",
        /// Another account already uses the username.
        DuplicateUsername => "a user with this username already exists",
    }
}

/// Registration details together with the hashed password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub registration: UserRegistration,
    pub password_hash: PasswordHash,
}

/// A user and the hash their password is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch every user among `ids` that exists, in no particular order.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError>;

    /// Fetch a user and password hash by normalised email.
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Replace the stored password hash.
    async fn update_password(
        &self,
        id: UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserRepositoryError>;

    /// Set or clear the avatar path.
    async fn update_avatar(
        &self,
        id: UserId,
        avatar: Option<MediaPath>,
    ) -> Result<(), UserRepositoryError>;

    /// Users ordered by id.
    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<User>, UserRepositoryError>;

    /// Number of registered users.
    async fn count(&self) -> Result<u64, UserRepositoryError>;
}
