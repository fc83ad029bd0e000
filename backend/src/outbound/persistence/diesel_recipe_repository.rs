//! PostgreSQL-backed `RecipeRepository`.
//!
//! Writes touch `recipes` and `recipe_ingredients` inside one transaction so a
//! recipe is never visible with a partial ingredient list. Reads load a page
//! of recipes, then every ingredient line of that page in a single query.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    MediaPath, Recipe, RecipeFilter, RecipeId, RecipeIngredient, RecipeRecord, RecipeSummary,
    UserId,
};

use super::diesel_basic_error_mapping::{
    from_db_count, from_db_int, map_basic_diesel_error, map_basic_pool_error, to_db_int,
    to_db_window,
};
use super::diesel_helpers::contains_pattern;
use super::diesel_ingredient_repository::row_to_ingredient;
use super::models::{
    IngredientRow, NewRecipeIngredientRow, NewRecipeRow, RecipeFieldsRow, RecipeRow,
    RecipeSummaryRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, ingredients, recipe_ingredients, recipes, shopping_cart};

/// Diesel-backed implementation of the [`RecipeRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> RecipeRepositoryError {
    move |error| {
        map_basic_diesel_error(
            error,
            operation,
            RecipeRepositoryError::query,
            RecipeRepositoryError::connection,
        )
    }
}

/// Column values for a recipe write, with integers narrowed for storage.
struct RecipeWrite<'a> {
    fields: RecipeFieldsRow<'a>,
    lines: Vec<(i64, i32)>,
}

impl<'a> RecipeWrite<'a> {
    fn from_record(record: &'a RecipeRecord) -> Result<Self, RecipeRepositoryError> {
        let lines = record
            .ingredients
            .iter()
            .map(|line| {
                to_db_int(line.amount, "amount", RecipeRepositoryError::query)
                    .map(|amount| (line.ingredient_id.get(), amount))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            fields: RecipeFieldsRow {
                name: &record.name,
                text: &record.text,
                cooking_time: to_db_int(
                    record.cooking_time,
                    "cooking_time",
                    RecipeRepositoryError::query,
                )?,
                image: record.image.as_ref(),
            },
            lines,
        })
    }

    fn line_rows(&self, recipe_id: i64) -> Vec<NewRecipeIngredientRow> {
        self.lines
            .iter()
            .map(|&(ingredient_id, amount)| NewRecipeIngredientRow {
                recipe_id,
                ingredient_id,
                amount,
            })
            .collect()
    }
}

/// Recipes matching every criterion present in `filter`.
fn filtered(filter: &RecipeFilter) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author.get()));
    }
    if let Some(user) = filter.favorited_by {
        query = query.filter(
            recipes::id.eq_any(
                favorites::table
                    .filter(favorites::user_id.eq(user.get()))
                    .select(favorites::recipe_id),
            ),
        );
    }
    if let Some(user) = filter.in_shopping_cart_of {
        query = query.filter(
            recipes::id.eq_any(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user.get()))
                    .select(shopping_cart::recipe_id),
            ),
        );
    }
    if let Some(needle) = &filter.name_contains {
        query = query.filter(recipes::name.ilike(contains_pattern(needle)));
    }
    query
}

/// Ingredient lines of `recipe_ids`, grouped by recipe in written order.
async fn load_lines(
    conn: &mut AsyncPgConnection,
    recipe_ids: Vec<i64>,
) -> Result<HashMap<i64, Vec<RecipeIngredient>>, RecipeRepositoryError> {
    let rows: Vec<(i64, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order_by(recipe_ingredients::id)
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .load(conn)
        .await
        .map_err(map_diesel_error("load ingredient lines"))?;

    let mut grouped: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, amount, ingredient) in rows {
        grouped.entry(recipe_id).or_default().push(RecipeIngredient {
            ingredient: row_to_ingredient(ingredient),
            amount: from_db_int(amount, "amount", RecipeRepositoryError::query)?,
        });
    }
    Ok(grouped)
}

fn assemble(
    row: RecipeRow,
    lines: &mut HashMap<i64, Vec<RecipeIngredient>>,
) -> Result<Recipe, RecipeRepositoryError> {
    Ok(Recipe {
        id: RecipeId::new(row.id),
        author_id: UserId::new(row.author_id),
        cooking_time: from_db_int(row.cooking_time, "cooking_time", RecipeRepositoryError::query)?,
        ingredients: lines.remove(&row.id).unwrap_or_default(),
        name: row.name,
        text: row.text,
        image: MediaPath::new(row.image),
    })
}

fn row_to_summary(row: RecipeSummaryRow) -> Result<RecipeSummary, RecipeRepositoryError> {
    Ok(RecipeSummary {
        id: RecipeId::new(row.id),
        cooking_time: from_db_int(row.cooking_time, "cooking_time", RecipeRepositoryError::query)?,
        name: row.name,
        image: MediaPath::new(row.image),
    })
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        author: UserId,
        record: &RecipeRecord,
    ) -> Result<RecipeId, RecipeRepositoryError> {
        let write = RecipeWrite::from_record(record)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = conn
            .transaction(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(recipes::table)
                        .values(&NewRecipeRow {
                            author_id: author.get(),
                            fields: write.fields.clone(),
                        })
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(recipe_ingredients::table)
                        .values(&write.line_rows(id))
                        .execute(conn)
                        .await?;
                    Ok(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error("create recipe"))?;
        Ok(RecipeId::new(id))
    }

    async fn update(&self, id: RecipeId, record: &RecipeRecord) -> Result<(), RecipeRepositoryError> {
        let write = RecipeWrite::from_record(record)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::update(recipes::table.find(id.get()))
                    .set(&write.fields)
                    .execute(conn)
                    .await?;
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id.get())),
                )
                .execute(conn)
                .await?;
                diesel::insert_into(recipe_ingredients::table)
                    .values(&write.line_rows(id.get()))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error("update recipe"))
    }

    async fn delete(&self, id: RecipeId) -> Result<(), RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error("delete recipe"))
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("find recipe"))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut lines = load_lines(&mut conn, vec![row.id]).await?;
        assemble(row, &mut lines).map(Some)
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let (offset, limit) = to_db_window(offset, limit, RecipeRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RecipeRow> = filtered(filter)
            .select(RecipeRow::as_select())
            .order_by(recipes::id.desc())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("list recipes"))?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut lines = load_lines(&mut conn, rows.iter().map(|row| row.id).collect()).await?;
        rows.into_iter()
            .map(|row| assemble(row, &mut lines))
            .collect()
    }

    async fn count(&self, filter: &RecipeFilter) -> Result<u64, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error("count recipes"))?;
        from_db_count(total, RecipeRepositoryError::query)
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .order_by(recipes::id.desc())
            .select(RecipeSummaryRow::as_select())
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(i64::from(limit));
        }
        let rows: Vec<RecipeSummaryRow> = query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("list author recipes"))?;
        rows.into_iter().map(row_to_summary).collect()
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error("count author recipes"))?;
        from_db_count(total, RecipeRepositoryError::query)
    }

    async fn ingredient_lines(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<RecipeIngredient>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut lines = load_lines(&mut conn, vec![recipe.get()]).await?;
        Ok(lines.remove(&recipe.get()).unwrap_or_default())
    }
}
