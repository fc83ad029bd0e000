//! Driving port for account management: registration, profiles, passwords
//! and avatars.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use zeroize::Zeroizing;

use crate::domain::{Error, ImageUpload, MediaPath, User, UserId, UserProfile, UserRegistration};

/// Registration payload with the raw password still to be checked.
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub registration: UserRegistration,
    pub password: Zeroizing<String>,
}

/// Password change payload.
#[derive(Debug, Clone)]
pub struct ChangePasswordRequest {
    pub current_password: Zeroizing<String>,
    pub new_password: Zeroizing<String>,
}

#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create an account after applying the password policy.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Page through users ordered by id.
    async fn users(&self, page: PageRequest) -> Result<Page<User>, Error>;

    /// A user as seen by `viewer`.
    async fn profile(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error>;

    async fn change_password(
        &self,
        user: UserId,
        request: ChangePasswordRequest,
    ) -> Result<(), Error>;

    /// Store a new avatar and return its media path.
    async fn set_avatar(&self, user: UserId, image: ImageUpload) -> Result<MediaPath, Error>;

    /// Remove the avatar file and clear the reference.
    async fn clear_avatar(&self, user: UserId) -> Result<(), Error>;
}
