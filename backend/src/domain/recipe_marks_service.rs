//! Favourites and the shopping cart.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::error_mapping::field_error;
use crate::domain::ports::{RecipeMarkRepository, RecipeMarksCommand, RecipeRepository};
use crate::domain::{Error, Recipe, RecipeId, RecipeMark, RecipeSummary, UserId};

#[derive(Clone)]
pub struct RecipeMarksService<R, K> {
    recipes: Arc<R>,
    marks: Arc<K>,
}

impl<R, K> RecipeMarksService<R, K> {
    pub fn new(recipes: Arc<R>, marks: Arc<K>) -> Self {
        Self { recipes, marks }
    }
}

impl<R, K> RecipeMarksService<R, K>
where
    R: RecipeRepository,
{
    async fn existing_recipe(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }
}

#[async_trait]
impl<R, K> RecipeMarksCommand for RecipeMarksService<R, K>
where
    R: RecipeRepository,
    K: RecipeMarkRepository,
{
    async fn mark(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let found = self.existing_recipe(recipe).await?;
        if !self.marks.add(mark, user, recipe).await? {
            return Err(field_error(
                "recipe",
                "already_marked",
                format!("recipe is already in {}", mark.label()),
            ));
        }
        info!(user_id = %user, recipe_id = %recipe, mark = mark.label(), "recipe marked");
        Ok(found.summary())
    }

    async fn unmark(&self, mark: RecipeMark, user: UserId, recipe: RecipeId) -> Result<(), Error> {
        self.existing_recipe(recipe).await?;
        if !self.marks.remove(mark, user, recipe).await? {
            return Err(field_error(
                "recipe",
                "not_marked",
                format!("recipe is not in {}", mark.label()),
            ));
        }
        info!(user_id = %user, recipe_id = %recipe, mark = mark.label(), "recipe unmarked");
        Ok(())
    }
}
