//! Port for follower relationships between users.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "subscription repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Make `user` follow `author`. Returns `false` when already following.
    async fn add(&self, user: UserId, author: UserId) -> Result<bool, SubscriptionRepositoryError>;

    /// Stop following. Returns `false` when `user` was not following.
    async fn remove(
        &self,
        user: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    /// Which of `authors` the user follows.
    async fn subscribed_among(
        &self,
        user: UserId,
        authors: &[UserId],
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError>;

    /// Followed authors in the order the subscriptions were made.
    async fn authors(
        &self,
        user: UserId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<User>, SubscriptionRepositoryError>;

    async fn count_authors(&self, user: UserId) -> Result<u64, SubscriptionRepositoryError>;
}
