//! PostgreSQL-backed `IngredientRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IngredientRepository, IngredientRepositoryError};
use crate::domain::{Ingredient, IngredientId, IngredientSeed};

use super::diesel_basic_error_mapping::{from_db_count, map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::prefix_pattern;
use super::models::{IngredientRow, NewIngredientRow};
use super::pool::{DbPool, PoolError};
use super::schema::ingredients;

/// Rows per insert statement; keeps bind parameters well under the
/// PostgreSQL limit.
const INSERT_CHUNK: usize = 1_000;

/// Diesel-backed implementation of the [`IngredientRepository`] port.
#[derive(Clone)]
pub struct DieselIngredientRepository {
    pool: DbPool,
}

impl DieselIngredientRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IngredientRepositoryError {
    map_basic_pool_error(error, IngredientRepositoryError::connection)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> IngredientRepositoryError {
    move |error| {
        map_basic_diesel_error(
            error,
            operation,
            IngredientRepositoryError::query,
            IngredientRepositoryError::connection,
        )
    }
}

pub(super) fn row_to_ingredient(row: IngredientRow) -> Ingredient {
    Ingredient {
        id: IngredientId::new(row.id),
        name: row.name,
        measurement_unit: row.measurement_unit,
    }
}

#[async_trait]
impl IngredientRepository for DieselIngredientRepository {
    async fn search(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .select(IngredientRow::as_select())
            .order_by((ingredients::name, ingredients::id))
            .into_boxed();
        if let Some(prefix) = name_prefix {
            query = query.filter(ingredients::name.ilike(prefix_pattern(&prefix)));
        }
        let rows: Vec<IngredientRow> = query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("search ingredients"))?;
        Ok(rows.into_iter().map(row_to_ingredient).collect())
    }

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .find(id.get())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("find ingredient"))?;
        Ok(row.map(row_to_ingredient))
    }

    async fn existing_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, IngredientRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let found: Vec<i64> = ingredients::table
            .filter(ingredients::id.eq_any(raw))
            .select(ingredients::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("check ingredients"))?;
        Ok(found.into_iter().map(IngredientId::new).collect())
    }

    async fn insert_missing(
        &self,
        seeds: &[IngredientSeed],
    ) -> Result<usize, IngredientRepositoryError> {
        if seeds.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut inserted = 0;
        for chunk in seeds.chunks(INSERT_CHUNK) {
            let rows: Vec<NewIngredientRow<'_>> = chunk
                .iter()
                .map(|seed| NewIngredientRow {
                    name: &seed.name,
                    measurement_unit: &seed.measurement_unit,
                })
                .collect();
            inserted += diesel::insert_into(ingredients::table)
                .values(&rows)
                .on_conflict((ingredients::name, ingredients::measurement_unit))
                .do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error("insert ingredients"))?;
        }
        Ok(inserted)
    }

    async fn count(&self) -> Result<u64, IngredientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = ingredients::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error("count ingredients"))?;
        from_db_count(total, IngredientRepositoryError::query)
    }
}
