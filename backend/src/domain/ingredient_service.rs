//! Ingredient lookups and imports.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{IngredientCatalogue, IngredientRepository};
use crate::domain::{Error, Ingredient, IngredientId, IngredientImportSummary, IngredientSeed};

#[derive(Clone)]
pub struct IngredientService<I> {
    ingredients: Arc<I>,
}

impl<I> IngredientService<I> {
    pub fn new(ingredients: Arc<I>) -> Self {
        Self { ingredients }
    }
}

impl<I> IngredientService<I>
where
    I: IngredientRepository,
{
    /// Insert seeds that are not stored yet. Blank and repeated rows are
    /// skipped, so running an import twice changes nothing.
    pub async fn import(&self, seeds: Vec<IngredientSeed>) -> Result<IngredientImportSummary, Error> {
        let read = seeds.len();
        let mut seen = HashSet::with_capacity(read);
        let complete: Vec<IngredientSeed> = seeds
            .into_iter()
            .filter(IngredientSeed::is_complete)
            .filter(|seed| seen.insert(seed.clone()))
            .collect();
        let skipped = read - complete.len();
        let inserted = self.ingredients.insert_missing(&complete).await?;
        info!(read, inserted, skipped, "ingredients imported");
        Ok(IngredientImportSummary {
            read,
            inserted,
            skipped,
        })
    }

    /// Import only when no ingredient exists yet. Used at startup.
    pub async fn seed_if_empty(
        &self,
        seeds: Vec<IngredientSeed>,
    ) -> Result<Option<IngredientImportSummary>, Error> {
        if self.ingredients.count().await? > 0 {
            return Ok(None);
        }
        self.import(seeds).await.map(Some)
    }
}

#[async_trait]
impl<I> IngredientCatalogue for IngredientService<I>
where
    I: IngredientRepository,
{
    async fn search(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, Error> {
        let prefix = name_prefix.filter(|prefix| !prefix.is_empty());
        Ok(self.ingredients.search(prefix).await?)
    }

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.ingredients
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}
