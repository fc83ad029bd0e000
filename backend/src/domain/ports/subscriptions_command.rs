//! Driving port for following authors and listing followed authors.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, SubscriptionView, UserId};

#[async_trait]
pub trait Subscriptions: Send + Sync {
    /// Follow `author`. Recipes in the returned view are capped at
    /// `recipes_limit` when given.
    async fn subscribe(
        &self,
        user: UserId,
        author: UserId,
        recipes_limit: Option<u32>,
    ) -> Result<SubscriptionView, Error>;

    async fn unsubscribe(&self, user: UserId, author: UserId) -> Result<(), Error>;

    /// Followed authors in subscription order.
    async fn subscriptions(
        &self,
        user: UserId,
        page: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<Page<SubscriptionView>, Error>;
}
