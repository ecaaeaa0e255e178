//! Database operations for the `news_records` table.
//!
//! One row per unique content fingerprint. Enrichment writes are guarded by
//! `WHERE processing_stage = <expected>` so a stage can neither regress nor
//! be written twice — a guard miss surfaces as [`DbError::NotFound`].

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `news_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NewsRecordRow {
    pub id: i64,
    pub content_hash: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub attribute: String,
    pub category: Option<String>,
    /// JSONB array of industry names.
    pub impact_industries: Value,
    /// JSONB array of instrument symbols.
    pub impact_instruments: Value,
    pub impact_strength: Option<String>,
    pub processing_stage: String,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const RECORD_COLUMNS: &str = "id, content_hash, content, published_at, attribute, category, \
     impact_industries, impact_instruments, impact_strength, processing_stage, \
     failure_reason, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns `true` if a record with this content fingerprint is already stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn record_exists(pool: &PgPool, content_hash: &str) -> Result<bool, DbError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM news_records WHERE content_hash = $1)")
            .bind(content_hash)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

/// Fetch a record by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_record(pool: &PgPool, id: i64) -> Result<Option<NewsRecordRow>, DbError> {
    let row = sqlx::query_as::<_, NewsRecordRow>(&format!(
        "SELECT {RECORD_COLUMNS} FROM news_records WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Insert a freshly scraped headline with `processing_stage = 'ingested'`.
///
/// The unique constraint on `content_hash` is the dedup authority: two
/// workers racing on the same headline cannot both succeed, the loser gets
/// [`DbError::Duplicate`].
///
/// # Errors
///
/// - [`DbError::Duplicate`] if the fingerprint is already stored.
/// - [`DbError::Sqlx`] for any other insert failure.
pub async fn insert_record(
    pool: &PgPool,
    content_hash: &str,
    content: &str,
    published_at: DateTime<Utc>,
) -> Result<NewsRecordRow, DbError> {
    let row = sqlx::query_as::<_, NewsRecordRow>(&format!(
        "INSERT INTO news_records (content_hash, content, published_at) \
         VALUES ($1, $2, $3) \
         RETURNING {RECORD_COLUMNS}"
    ))
    .bind(content_hash)
    .bind(content)
    .bind(published_at)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)?;

    Ok(row)
}

/// Persist the classification outcome and advance `ingested → classified`.
///
/// # Errors
///
/// - [`DbError::NotFound`] if the record does not exist or is not at
///   `ingested` (stage guard).
/// - [`DbError::Sqlx`] if the update fails.
pub async fn update_classification(
    pool: &PgPool,
    id: i64,
    attribute: &str,
    category: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE news_records \
         SET attribute = $1, category = $2, processing_stage = 'classified', updated_at = NOW() \
         WHERE id = $3 AND processing_stage = 'ingested'",
    )
    .bind(attribute)
    .bind(category)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Persist the financial-impact fields and advance `classified → analyzed`.
///
/// # Errors
///
/// - [`DbError::NotFound`] if the record does not exist or is not at
///   `classified` (stage guard).
/// - [`DbError::Sqlx`] if the update fails.
pub async fn update_financial_analysis(
    pool: &PgPool,
    id: i64,
    industries: &[String],
    instruments: &[String],
    strength: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE news_records \
         SET impact_industries = $1, impact_instruments = $2, impact_strength = $3, \
             processing_stage = 'analyzed', updated_at = NOW() \
         WHERE id = $4 AND processing_stage = 'classified'",
    )
    .bind(Value::from(industries.to_vec()))
    .bind(Value::from(instruments.to_vec()))
    .bind(strength)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Mark a record as terminally failed, keeping whatever enrichment already
/// committed. A record that reached `analyzed` (or is already `failed`) is
/// left untouched — the guard makes the call a no-op, not an error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_failed(pool: &PgPool, id: i64, reason: &str) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE news_records \
         SET processing_stage = 'failed', failure_reason = $1, updated_at = NOW() \
         WHERE id = $2 AND processing_stage IN ('ingested', 'classified')",
    )
    .bind(reason)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// List records still awaiting enrichment (`ingested` or `classified`),
/// oldest first. Drives idempotent backlog resumption: `analyzed` and
/// `failed` records never show up here.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unfinished_records(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<NewsRecordRow>, DbError> {
    let rows = sqlx::query_as::<_, NewsRecordRow>(&format!(
        "SELECT {RECORD_COLUMNS} FROM news_records \
         WHERE processing_stage IN ('ingested', 'classified') \
         ORDER BY id ASC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Map a unique-constraint violation on insert to [`DbError::Duplicate`].
fn map_unique_violation(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return DbError::Duplicate;
        }
    }
    DbError::Sqlx(err)
}
