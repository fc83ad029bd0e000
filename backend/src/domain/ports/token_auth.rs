//! Driving port for token login, logout and request authentication.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, LoginCredentials, TokenDigest, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenAuth: Send + Sync {
    /// Check credentials and issue a fresh token. Tokens issued earlier stay
    /// valid.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error>;

    /// Revoke the token the user presented.
    async fn logout(&self, user: UserId, token: &TokenDigest) -> Result<(), Error>;

    /// Resolve the user presenting `key`, failing with `unauthorized`.
    async fn authenticate(&self, key: &str) -> Result<UserId, Error>;
}
