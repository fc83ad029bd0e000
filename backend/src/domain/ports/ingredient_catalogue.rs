//! Driving port for ingredient lookups.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId};

#[async_trait]
pub trait IngredientCatalogue: Send + Sync {
    /// Ingredients whose name starts with `name_prefix`, ignoring case.
    async fn search(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, Error>;

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;
}
