//! Port for API token storage.
//!
//! Adapters store token digests only. A user may hold several tokens, one
//! per logged-in client.

use async_trait::async_trait;

use crate::domain::{TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum TokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Store `digest` as an additional token for `user`.
    async fn store(&self, user: UserId, digest: &TokenDigest) -> Result<(), TokenRepositoryError>;

    /// Resolve the owner of a token digest.
    async fn find_user(&self, digest: &TokenDigest) -> Result<Option<UserId>, TokenRepositoryError>;

    /// Delete a single token. Unknown digests are ignored.
    async fn revoke(&self, digest: &TokenDigest) -> Result<(), TokenRepositoryError>;
}
