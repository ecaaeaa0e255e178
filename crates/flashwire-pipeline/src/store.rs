//! Store seam between the pipeline and persistence.
//!
//! [`NewsStore`] is the contract the orchestrator drives; [`PgNewsStore`]
//! is the production implementation over the `flashwire-db` queries. Tests
//! substitute an in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use flashwire_core::{Attribute, FinancialImpact, ProcessingStage};
use flashwire_db::DbError;

/// The slice of a persisted record the pipeline needs to drive enrichment.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: i64,
    pub content: String,
    pub stage: ProcessingStage,
}

/// Persistence contract of the pipeline.
///
/// All mutation methods carry the store's stage guards: a write that would
/// regress or repeat a stage fails with [`DbError::NotFound`], and a racing
/// insert on the same fingerprint fails with [`DbError::Duplicate`].
#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn record_exists(&self, content_hash: &str) -> Result<bool, DbError>;

    async fn insert_record(
        &self,
        content_hash: &str,
        content: &str,
        published_at: DateTime<Utc>,
    ) -> Result<StoredRecord, DbError>;

    async fn update_classification(
        &self,
        id: i64,
        attribute: Attribute,
        category: &str,
    ) -> Result<(), DbError>;

    async fn update_financial_analysis(
        &self,
        id: i64,
        impact: &FinancialImpact,
    ) -> Result<(), DbError>;

    async fn mark_failed(&self, id: i64, reason: &str) -> Result<(), DbError>;

    async fn list_unfinished(&self, limit: i64) -> Result<Vec<StoredRecord>, DbError>;
}

/// Postgres-backed [`NewsStore`].
#[derive(Clone)]
pub struct PgNewsStore {
    pool: PgPool,
}

impl PgNewsStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_stored(row: flashwire_db::NewsRecordRow) -> StoredRecord {
    StoredRecord {
        id: row.id,
        content: row.content,
        // The stage column is CHECK-constrained to the known set; an
        // unknown value can only mean schema drift, treated as terminal.
        stage: ProcessingStage::parse(&row.processing_stage).unwrap_or(ProcessingStage::Failed),
    }
}

#[async_trait]
impl NewsStore for PgNewsStore {
    async fn record_exists(&self, content_hash: &str) -> Result<bool, DbError> {
        flashwire_db::record_exists(&self.pool, content_hash).await
    }

    async fn insert_record(
        &self,
        content_hash: &str,
        content: &str,
        published_at: DateTime<Utc>,
    ) -> Result<StoredRecord, DbError> {
        let row =
            flashwire_db::insert_record(&self.pool, content_hash, content, published_at).await?;
        Ok(to_stored(row))
    }

    async fn update_classification(
        &self,
        id: i64,
        attribute: Attribute,
        category: &str,
    ) -> Result<(), DbError> {
        flashwire_db::update_classification(&self.pool, id, attribute.as_str(), category).await
    }

    async fn update_financial_analysis(
        &self,
        id: i64,
        impact: &FinancialImpact,
    ) -> Result<(), DbError> {
        flashwire_db::update_financial_analysis(
            &self.pool,
            id,
            &impact.industries,
            &impact.instruments,
            impact.strength.as_str(),
        )
        .await
    }

    async fn mark_failed(&self, id: i64, reason: &str) -> Result<(), DbError> {
        flashwire_db::mark_failed(&self.pool, id, reason).await
    }

    async fn list_unfinished(&self, limit: i64) -> Result<Vec<StoredRecord>, DbError> {
        let rows = flashwire_db::list_unfinished_records(&self.pool, limit).await?;
        Ok(rows.into_iter().map(to_stored).collect())
    }
}
