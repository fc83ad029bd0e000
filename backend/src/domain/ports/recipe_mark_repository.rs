//! Port for per-user recipe marks (favourites and the shopping cart).

use async_trait::async_trait;

use crate::domain::{RecipeId, RecipeMark, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe mark repository adapters.
    pub enum RecipeMarkRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe mark repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe mark repository query failed: {message}",
    }
}

/// A mark is a unique `(user, recipe)` pair per [`RecipeMark`] kind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeMarkRepository: Send + Sync {
    /// Record the mark. Returns `false` when it already existed.
    async fn add(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeMarkRepositoryError>;

    /// Remove the mark. Returns `false` when there was nothing to remove.
    async fn remove(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeMarkRepositoryError>;

    /// Which of `recipes` the user has marked.
    async fn marked_among(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<Vec<RecipeId>, RecipeMarkRepositoryError>;

    /// Every recipe the user has marked, in the order the marks were made.
    async fn recipe_ids(
        &self,
        mark: RecipeMark,
        user: UserId,
    ) -> Result<Vec<RecipeId>, RecipeMarkRepositoryError>;
}
