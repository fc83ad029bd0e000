//! Driving port for the aggregated shopping list download.

use async_trait::async_trait;

use crate::domain::{Error, ShoppingList, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListQuery: Send + Sync {
    /// Sum the ingredients of every recipe in the user's cart.
    async fn shopping_list(&self, user: UserId) -> Result<ShoppingList, Error>;
}
