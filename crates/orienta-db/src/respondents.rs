//! Database operations for the `respondents` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `respondents` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RespondentRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i16,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new respondent. The email must already be normalized
/// (trimmed, lower-cased) by the caller; age bounds are validated at the
/// HTTP layer and re-enforced by a CHECK constraint.
#[derive(Debug, Clone)]
pub struct NewRespondent {
    pub first_name: String,
    pub last_name: String,
    pub age: i16,
    pub email: String,
}

/// Insert a respondent. The unique index on `email` makes this an atomic
/// check-and-insert.
///
/// # Errors
///
/// Returns [`DbError::DuplicateEmail`] when the email is already registered,
/// or [`DbError::Sqlx`] for any other failure.
pub async fn insert_respondent(
    pool: &PgPool,
    new: &NewRespondent,
) -> Result<RespondentRow, DbError> {
    let row = sqlx::query_as::<_, RespondentRow>(
        "INSERT INTO respondents (first_name, last_name, age, email) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, first_name, last_name, age, email, created_at",
    )
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(new.age)
    .bind(&new.email)
    .fetch_one(pool)
    .await
    .map_err(DbError::from)
    .map_err(|e| {
        if e.is_unique_violation() {
            DbError::DuplicateEmail
        } else {
            e
        }
    })?;

    Ok(row)
}

/// Fetch a respondent by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_respondent(pool: &PgPool, id: i64) -> Result<Option<RespondentRow>, DbError> {
    let row = sqlx::query_as::<_, RespondentRow>(
        "SELECT id, first_name, last_name, age, email, created_at \
         FROM respondents \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
