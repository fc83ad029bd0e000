//! PostgreSQL-backed `RecipeMarkRepository`.
//!
//! Favourites and cart entries live in two tables with the same shape;
//! [`on_mark_table!`] picks the table for a [`RecipeMark`] so each query is
//! written once.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecipeMarkRepository, RecipeMarkRepositoryError};
use crate::domain::{RecipeId, RecipeMark, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};

/// Evaluate `$body` with `$table` bound to the schema module of `$mark`.
macro_rules! on_mark_table {
    ($mark:expr, |$table:ident| $body:expr) => {
        match $mark {
            RecipeMark::Favorite => {
                use super::schema::favorites as $table;
                $body
            }
            RecipeMark::ShoppingCart => {
                use super::schema::shopping_cart as $table;
                $body
            }
        }
    };
}

/// Diesel-backed implementation of the [`RecipeMarkRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeMarkRepository {
    pool: DbPool,
}

impl DieselRecipeMarkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeMarkRepositoryError {
    map_basic_pool_error(error, RecipeMarkRepositoryError::connection)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> RecipeMarkRepositoryError {
    move |error| {
        map_basic_diesel_error(
            error,
            operation,
            RecipeMarkRepositoryError::query,
            RecipeMarkRepositoryError::connection,
        )
    }
}

#[async_trait]
impl RecipeMarkRepository for DieselRecipeMarkRepository {
    async fn add(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeMarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = on_mark_table!(mark, |table| {
            diesel::insert_into(table::table)
                .values((
                    table::user_id.eq(user.get()),
                    table::recipe_id.eq(recipe.get()),
                ))
                .on_conflict((table::user_id, table::recipe_id))
                .do_nothing()
                .execute(&mut conn)
                .await
        })
        .map_err(map_diesel_error("add recipe mark"))?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeMarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = on_mark_table!(mark, |table| {
            diesel::delete(
                table::table
                    .filter(table::user_id.eq(user.get()))
                    .filter(table::recipe_id.eq(recipe.get())),
            )
            .execute(&mut conn)
            .await
        })
        .map_err(map_diesel_error("remove recipe mark"))?;
        Ok(removed > 0)
    }

    async fn marked_among(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<Vec<RecipeId>, RecipeMarkRepositoryError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = recipes.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let marked: Vec<i64> = on_mark_table!(mark, |table| {
            table::table
                .filter(table::user_id.eq(user.get()))
                .filter(table::recipe_id.eq_any(raw))
                .select(table::recipe_id)
                .load(&mut conn)
                .await
        })
        .map_err(map_diesel_error("load recipe marks"))?;
        Ok(marked.into_iter().map(RecipeId::new).collect())
    }

    async fn recipe_ids(
        &self,
        mark: RecipeMark,
        user: UserId,
    ) -> Result<Vec<RecipeId>, RecipeMarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i64> = on_mark_table!(mark, |table| {
            table::table
                .filter(table::user_id.eq(user.get()))
                .order_by(table::id)
                .select(table::recipe_id)
                .load(&mut conn)
                .await
        })
        .map_err(map_diesel_error("list recipe marks"))?;
        Ok(ids.into_iter().map(RecipeId::new).collect())
    }
}
