//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Stored values are re-validated on the way out so a row that no longer
//! satisfies the domain rules surfaces as a query error instead of leaking an
//! invalid `User`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUserRecord, StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{Email, MediaPath, PasswordHash, PersonName, User, UserId, Username};

use super::diesel_basic_error_mapping::{
    from_db_count, map_basic_diesel_error, map_basic_pool_error, to_db_window,
    violated_unique_constraint,
};
use super::models::{CredentialsRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(operation: &'static str) -> impl FnOnce(diesel::result::Error) -> UserRepositoryError {
    move |error| {
        map_basic_diesel_error(
            error,
            operation,
            UserRepositoryError::query,
            UserRepositoryError::connection,
        )
    }
}

/// Distinguish duplicate email/username from other insert failures.
fn map_insert_error(error: diesel::result::Error) -> UserRepositoryError {
    match violated_unique_constraint(&error) {
        Some(EMAIL_CONSTRAINT) => UserRepositoryError::duplicate_email(),
        Some(USERNAME_CONSTRAINT) => UserRepositoryError::duplicate_username(),
        _ => map_diesel_error("insert user")(error),
    }
}

pub(super) fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let invalid = |err: crate::domain::UserValidationError| {
        UserRepositoryError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    Ok(User {
        id: UserId::new(row.id),
        email: Email::new(row.email.as_str()).map_err(invalid)?,
        username: Username::new(row.username.as_str()).map_err(invalid)?,
        first_name: PersonName::new("first_name", row.first_name.as_str()).map_err(invalid)?,
        last_name: PersonName::new("last_name", row.last_name.as_str()).map_err(invalid)?,
        avatar: row.avatar.map(MediaPath::new),
    })
}

pub(super) fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserRepositoryError> {
    rows.into_iter().map(row_to_user).collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let registration = &record.registration;
        let row = NewUserRow {
            email: registration.email.as_ref(),
            username: registration.username.as_ref(),
            first_name: registration.first_name.as_ref(),
            last_name: registration.last_name.as_ref(),
            password_hash: record.password_hash.as_ref(),
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_insert_error)?;
        row_to_user(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("find user"))?;
        row.map(row_to_user).transpose()
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(raw))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("find users"))?;
        rows_to_users(rows)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CredentialsRow> = users::table
            .filter(users::email.eq(email))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("find credentials"))?;
        row.map(|row| {
            Ok(StoredCredentials {
                user: row_to_user(row.user)?,
                password_hash: PasswordHash::new(row.password_hash),
            })
        })
        .transpose()
    }

    async fn update_password(
        &self,
        id: UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(id.get()))
            .set(users::password_hash.eq(password_hash.as_ref()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error("update password"))
    }

    async fn update_avatar(
        &self,
        id: UserId,
        avatar: Option<MediaPath>,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let value = avatar.as_ref().map(|path| path.as_ref().to_owned());
        diesel::update(users::table.find(id.get()))
            .set(users::avatar.eq(value))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error("update avatar"))
    }

    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<User>, UserRepositoryError> {
        let (offset, limit) = to_db_window(offset, limit, UserRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order_by(users::id)
            .offset(offset)
            .limit(limit)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("list users"))?;
        rows_to_users(rows)
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error("count users"))?;
        from_db_count(total, UserRepositoryError::query)
    }
}
