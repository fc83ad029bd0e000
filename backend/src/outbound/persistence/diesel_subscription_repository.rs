//! PostgreSQL-backed `SubscriptionRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{User, UserId};

use super::diesel_basic_error_mapping::{
    from_db_count, map_basic_diesel_error, map_basic_pool_error, to_db_window,
};
use super::diesel_user_repository::row_to_user;
use super::models::{NewSubscriptionRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{subscriptions, users};

/// Diesel-backed implementation of the [`SubscriptionRepository`] port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubscriptionRepositoryError {
    map_basic_pool_error(error, SubscriptionRepositoryError::connection)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> SubscriptionRepositoryError {
    move |error| {
        map_basic_diesel_error(
            error,
            operation,
            SubscriptionRepositoryError::query,
            SubscriptionRepositoryError::connection,
        )
    }
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn add(&self, user: UserId, author: UserId) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(subscriptions::table)
            .values(&NewSubscriptionRow {
                user_id: user.get(),
                author_id: author.get(),
            })
            .on_conflict((subscriptions::user_id, subscriptions::author_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error("subscribe"))?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        user: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user.get()))
                .filter(subscriptions::author_id.eq(author.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error("unsubscribe"))?;
        Ok(removed > 0)
    }

    async fn subscribed_among(
        &self,
        user: UserId,
        authors: &[UserId],
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError> {
        if authors.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = authors.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let followed: Vec<i64> = subscriptions::table
            .filter(subscriptions::user_id.eq(user.get()))
            .filter(subscriptions::author_id.eq_any(raw))
            .select(subscriptions::author_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("load subscriptions"))?;
        Ok(followed.into_iter().map(UserId::new).collect())
    }

    async fn authors(
        &self,
        user: UserId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<User>, SubscriptionRepositoryError> {
        let (offset, limit) = to_db_window(offset, limit, SubscriptionRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = subscriptions::table
            .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
            .filter(subscriptions::user_id.eq(user.get()))
            .order_by(subscriptions::id)
            .offset(offset)
            .limit(limit)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("list followed authors"))?;
        rows.into_iter()
            .map(|row| {
                row_to_user(row)
                    .map_err(|err| SubscriptionRepositoryError::query(err.to_string()))
            })
            .collect()
    }

    async fn count_authors(&self, user: UserId) -> Result<u64, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = subscriptions::table
            .filter(subscriptions::user_id.eq(user.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error("count subscriptions"))?;
        from_db_count(total, SubscriptionRepositoryError::query)
    }
}
