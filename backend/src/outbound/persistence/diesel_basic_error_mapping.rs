//! Shared Diesel error mapping for repositories with connection/query
//! semantics.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(super) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Closed connections become connection errors; everything else is a query
/// error. Database messages are logged at debug level and kept out of the
/// returned message.
pub(super) fn map_basic_diesel_error<E, Q, C>(
    error: DieselError,
    operation: &str,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query(format!("{operation}: record not found")),
        DieselError::QueryBuilderError(_) => query(format!("{operation}: database query error")),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection(format!("{operation}: database connection error"))
        }
        _ => query(format!("{operation}: database error")),
    }
}

/// Name of the unique constraint a failed insert violated, if any.
pub(super) fn violated_unique_constraint(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            info.constraint_name()
        }
        _ => None,
    }
}

/// Convert a bounded domain integer into its `INTEGER` column value.
pub(super) fn to_db_int<E>(value: u32, field: &str, query: impl FnOnce(String) -> E) -> Result<i32, E> {
    i32::try_from(value).map_err(|_| query(format!("{field} {value} exceeds column range")))
}

/// Convert an `INTEGER` column back into the unsigned domain value.
pub(super) fn from_db_int<E>(value: i32, field: &str, query: impl FnOnce(String) -> E) -> Result<u32, E> {
    u32::try_from(value).map_err(|_| query(format!("stored {field} {value} is negative")))
}

/// Convert a row count into the unsigned domain count.
pub(super) fn from_db_count<E>(value: i64, query: impl FnOnce(String) -> E) -> Result<u64, E> {
    u64::try_from(value).map_err(|_| query(format!("negative row count {value}")))
}

/// Convert an offset or limit into the `BIGINT` Diesel expects.
pub(super) fn to_db_window<E>(
    offset: u64,
    limit: u32,
    query: impl FnOnce(String) -> E,
) -> Result<(i64, i64), E> {
    let offset = i64::try_from(offset).map_err(|_| query(format!("offset {offset} too large")))?;
    Ok((offset, i64::from(limit)))
}
