//! Port for recipe persistence.

use async_trait::async_trait;

use crate::domain::{
    Recipe, RecipeFilter, RecipeId, RecipeIngredient, RecipeRecord, RecipeSummary, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

/// Storage of recipes and their ingredient lines.
///
/// Listing methods return recipes newest first (highest id first). Ingredient
/// lines keep the order they were written in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its ingredient lines.
    async fn create(
        &self,
        author: UserId,
        record: &RecipeRecord,
    ) -> Result<RecipeId, RecipeRepositoryError>;

    /// Overwrite a recipe's fields and replace its ingredient lines.
    async fn update(&self, id: RecipeId, record: &RecipeRecord)
    -> Result<(), RecipeRepositoryError>;

    /// Delete a recipe together with its lines and marks.
    async fn delete(&self, id: RecipeId) -> Result<(), RecipeRepositoryError>;

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    async fn list(
        &self,
        filter: &RecipeFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    async fn count(&self, filter: &RecipeFilter) -> Result<u64, RecipeRepositoryError>;

    /// Short forms of an author's recipes, newest first, at most `limit`.
    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError>;

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError>;

    /// Ingredient lines of one recipe with names and units resolved.
    async fn ingredient_lines(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<RecipeIngredient>, RecipeRepositoryError>;
}
