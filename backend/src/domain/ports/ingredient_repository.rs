//! Port for ingredient reference data.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, IngredientSeed};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ingredient repository adapters.
    pub enum IngredientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ingredient repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ingredient repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Ingredients ordered by name then id, optionally restricted to names
    /// starting with `name_prefix` (case-insensitive).
    async fn search(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError>;

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientRepositoryError>;

    /// Subset of `ids` that exist.
    async fn existing_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, IngredientRepositoryError>;

    /// Insert seeds whose `(name, unit)` pair is not stored yet and return
    /// how many rows were added.
    async fn insert_missing(
        &self,
        seeds: &[IngredientSeed],
    ) -> Result<usize, IngredientRepositoryError>;

    async fn count(&self) -> Result<u64, IngredientRepositoryError>;
}
