//! Database operations for the `analysis_runs` ledger.
//!
//! One row per pipeline invocation (`ingest` or `resume`). Status moves
//! `queued → running → succeeded | failed`; transitions are guarded UPDATEs
//! so a stale handle cannot rewind a finished run.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `analysis_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRunRow {
    pub id: i64,
    pub public_id: Uuid,
    /// `ingest` (scrape cycle) or `resume` (backlog drain).
    pub run_type: String,
    pub trigger_source: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub items_seen: i32,
    pub items_skipped: i32,
    pub items_analyzed: i32,
    pub items_failed: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Final per-outcome counters recorded on completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunCounters {
    pub seen: i32,
    pub skipped: i32,
    pub analyzed: i32,
    pub failed: i32,
}

const RUN_COLUMNS: &str = "id, public_id, run_type, trigger_source, status, started_at, \
     completed_at, items_seen, items_skipped, items_analyzed, items_failed, \
     error_message, created_at";

/// Creates a new analysis run in `queued` status and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_analysis_run(
    pool: &PgPool,
    run_type: &str,
    trigger_source: &str,
) -> Result<AnalysisRunRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, AnalysisRunRow>(&format!(
        "INSERT INTO analysis_runs (public_id, run_type, trigger_source, status) \
         VALUES ($1, $2, $3, 'queued') \
         RETURNING {RUN_COLUMNS}"
    ))
    .bind(public_id)
    .bind(run_type)
    .bind(trigger_source)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch a run by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_analysis_run(pool: &PgPool, id: i64) -> Result<Option<AnalysisRunRow>, DbError> {
    let row = sqlx::query_as::<_, AnalysisRunRow>(&format!(
        "SELECT {RUN_COLUMNS} FROM analysis_runs WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Marks a run as `running` and sets `started_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `queued`,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn start_analysis_run(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE analysis_runs \
         SET status = 'running', started_at = NOW() \
         WHERE id = $1 AND status = 'queued'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "queued",
        });
    }

    Ok(())
}

/// Marks a run as `succeeded`, recording the final counters.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn complete_analysis_run(
    pool: &PgPool,
    id: i64,
    counters: RunCounters,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE analysis_runs \
         SET status = 'succeeded', completed_at = NOW(), \
             items_seen = $1, items_skipped = $2, items_analyzed = $3, items_failed = $4 \
         WHERE id = $5 AND status = 'running'",
    )
    .bind(counters.seen)
    .bind(counters.skipped)
    .bind(counters.analyzed)
    .bind(counters.failed)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run as `failed` with an error message. Valid from `queued` or
/// `running`; completed runs are left untouched.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is already terminal,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn fail_analysis_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE analysis_runs \
         SET status = 'failed', completed_at = NOW(), error_message = $1 \
         WHERE id = $2 AND status IN ('queued', 'running')",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "queued or running",
        });
    }

    Ok(())
}
