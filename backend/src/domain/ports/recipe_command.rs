//! Driving port for recipe writes.

use async_trait::async_trait;

use crate::domain::{Error, ImageUpload, RecipeDraft, RecipeId, RecipeView, UserId};

#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Publish a recipe. `image` is required.
    async fn create(
        &self,
        author: UserId,
        draft: RecipeDraft,
        image: Option<ImageUpload>,
    ) -> Result<RecipeView, Error>;

    /// Replace a recipe's fields and ingredients. Only the author may edit;
    /// the current image is kept when `image` is `None`.
    async fn update(
        &self,
        editor: UserId,
        id: RecipeId,
        draft: RecipeDraft,
        image: Option<ImageUpload>,
    ) -> Result<RecipeView, Error>;

    /// Delete a recipe. Only the author may delete.
    async fn delete(&self, editor: UserId, id: RecipeId) -> Result<(), Error>;
}
