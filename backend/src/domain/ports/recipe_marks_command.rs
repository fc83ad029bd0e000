//! Driving port for favouriting recipes and managing the shopping cart.

use async_trait::async_trait;

use crate::domain::{Error, RecipeId, RecipeMark, RecipeSummary, UserId};

#[async_trait]
pub trait RecipeMarksCommand: Send + Sync {
    /// Add the mark; fails with `invalid_request` when already present.
    async fn mark(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error>;

    /// Remove the mark; fails with `invalid_request` when absent.
    async fn unmark(&self, mark: RecipeMark, user: UserId, recipe: RecipeId) -> Result<(), Error>;
}
