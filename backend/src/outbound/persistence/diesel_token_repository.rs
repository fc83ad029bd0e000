//! PostgreSQL-backed `TokenRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TokenRepository, TokenRepositoryError};
use crate::domain::{TokenDigest, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewAuthTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed implementation of the [`TokenRepository`] port.
#[derive(Clone)]
pub struct DieselTokenRepository {
    pool: DbPool,
}

impl DieselTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenRepositoryError {
    map_basic_pool_error(error, TokenRepositoryError::connection)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> TokenRepositoryError {
    move |error| {
        map_basic_diesel_error(
            error,
            operation,
            TokenRepositoryError::query,
            TokenRepositoryError::connection,
        )
    }
}

#[async_trait]
impl TokenRepository for DieselTokenRepository {
    async fn store(&self, user: UserId, digest: &TokenDigest) -> Result<(), TokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAuthTokenRow {
            digest: digest.as_ref(),
            user_id: user.get(),
        };
        diesel::insert_into(auth_tokens::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error("store token"))
    }

    async fn find_user(&self, digest: &TokenDigest) -> Result<Option<UserId>, TokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner: Option<i64> = auth_tokens::table
            .find(digest.as_ref())
            .select(auth_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("find token"))?;
        Ok(owner.map(UserId::new))
    }

    async fn revoke(&self, digest: &TokenDigest) -> Result<(), TokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(auth_tokens::table.find(digest.as_ref()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error("revoke token"))
    }
}
