//! Database operations for the `results` table (append-only).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `results` table. `predominant_profile` is NULL when every
/// answer mapped to zero tags; `tally` is the serialized score tally.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResultRow {
    pub id: i64,
    pub respondent_id: i64,
    pub predominant_profile: Option<String>,
    pub tally: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Insert one completed test outcome. A single statement — a failure leaves
/// nothing partially committed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including a missing
/// respondent, via the foreign key).
pub async fn insert_result(
    pool: &PgPool,
    respondent_id: i64,
    predominant_profile: Option<&str>,
    tally: &serde_json::Value,
) -> Result<ResultRow, DbError> {
    let row = sqlx::query_as::<_, ResultRow>(
        "INSERT INTO results (respondent_id, predominant_profile, tally) \
         VALUES ($1, $2, $3) \
         RETURNING id, respondent_id, predominant_profile, tally, created_at",
    )
    .bind(respondent_id)
    .bind(predominant_profile)
    .bind(tally)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// All results for one respondent, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_results_for_respondent(
    pool: &PgPool,
    respondent_id: i64,
) -> Result<Vec<ResultRow>, DbError> {
    let rows = sqlx::query_as::<_, ResultRow>(
        "SELECT id, respondent_id, predominant_profile, tally, created_at \
         FROM results \
         WHERE respondent_id = $1 \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(respondent_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
