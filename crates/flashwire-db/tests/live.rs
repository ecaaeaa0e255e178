//! Live integration tests for flashwire-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/flashwire-db/`), so `"../../migrations"` resolves to the
//! workspace migration directory. Ignored by default; run with a reachable
//! Postgres via `cargo test -- --ignored`.

use chrono::Utc;
use flashwire_db::{
    complete_analysis_run, create_analysis_run, fail_analysis_run, get_analysis_run, get_record,
    insert_record, list_unfinished_records, mark_failed, record_exists, start_analysis_run,
    update_classification, update_financial_analysis, DbError, RunCounters,
};

const HEADLINE: &str = "Central bank raises rates by 25bps";

fn fingerprint(content: &str) -> String {
    flashwire_core::content_fingerprint(content)
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres instance"]
async fn insert_then_exists_then_duplicate(pool: sqlx::PgPool) {
    let hash = fingerprint(HEADLINE);

    assert!(!record_exists(&pool, &hash).await.unwrap());

    let row = insert_record(&pool, &hash, HEADLINE, Utc::now()).await.unwrap();
    assert_eq!(row.content, HEADLINE);
    assert_eq!(row.processing_stage, "ingested");
    assert_eq!(row.attribute, "unclassified");

    assert!(record_exists(&pool, &hash).await.unwrap());

    let err = insert_record(&pool, &hash, HEADLINE, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Duplicate));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres instance"]
async fn full_enrichment_path(pool: sqlx::PgPool) {
    let hash = fingerprint(HEADLINE);
    let row = insert_record(&pool, &hash, HEADLINE, Utc::now()).await.unwrap();

    update_classification(&pool, row.id, "fact", "data_indicators")
        .await
        .unwrap();

    // Classification may only be written once.
    let err = update_classification(&pool, row.id, "opinion", "market_analysis")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound));

    let industries = vec!["banking".to_string()];
    let instruments = vec!["US10Y".to_string()];
    update_financial_analysis(&pool, row.id, &industries, &instruments, "high")
        .await
        .unwrap();

    let stored = get_record(&pool, row.id).await.unwrap().unwrap();
    assert_eq!(stored.processing_stage, "analyzed");
    assert_eq!(stored.attribute, "fact");
    assert_eq!(stored.category.as_deref(), Some("data_indicators"));
    assert_eq!(stored.impact_strength.as_deref(), Some("high"));

    // mark_failed on an analyzed record is a no-op, never a regression.
    mark_failed(&pool, row.id, "late failure").await.unwrap();
    let stored = get_record(&pool, row.id).await.unwrap().unwrap();
    assert_eq!(stored.processing_stage, "analyzed");
    assert!(stored.failure_reason.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres instance"]
async fn failed_classified_record_keeps_classification(pool: sqlx::PgPool) {
    let hash = fingerprint(HEADLINE);
    let row = insert_record(&pool, &hash, HEADLINE, Utc::now()).await.unwrap();

    update_classification(&pool, row.id, "fact", "data_indicators")
        .await
        .unwrap();
    mark_failed(&pool, row.id, "analysis: model output unparseable")
        .await
        .unwrap();

    let stored = get_record(&pool, row.id).await.unwrap().unwrap();
    assert_eq!(stored.processing_stage, "failed");
    assert_eq!(stored.attribute, "fact");
    assert_eq!(stored.category.as_deref(), Some("data_indicators"));
    assert_eq!(
        stored.failure_reason.as_deref(),
        Some("analysis: model output unparseable")
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres instance"]
async fn unfinished_listing_skips_terminal_records(pool: sqlx::PgPool) {
    let a = insert_record(&pool, &fingerprint("a"), "a", Utc::now()).await.unwrap();
    let b = insert_record(&pool, &fingerprint("b"), "b", Utc::now()).await.unwrap();
    let c = insert_record(&pool, &fingerprint("c"), "c", Utc::now()).await.unwrap();
    let d = insert_record(&pool, &fingerprint("d"), "d", Utc::now()).await.unwrap();

    update_classification(&pool, b.id, "fact", "risk_events").await.unwrap();
    update_classification(&pool, c.id, "fact", "risk_events").await.unwrap();
    update_financial_analysis(&pool, c.id, &[], &[], "none").await.unwrap();
    mark_failed(&pool, d.id, "classification: ambiguous").await.unwrap();

    let unfinished = list_unfinished_records(&pool, 10).await.unwrap();
    let ids: Vec<i64> = unfinished.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres instance"]
async fn analysis_run_lifecycle(pool: sqlx::PgPool) {
    let run = create_analysis_run(&pool, "ingest", "cli").await.unwrap();
    assert_eq!(run.status, "queued");

    start_analysis_run(&pool, run.id).await.unwrap();

    // Double-start is rejected by the status guard.
    let err = start_analysis_run(&pool, run.id).await.unwrap_err();
    assert!(matches!(err, DbError::InvalidRunTransition { .. }));

    let counters = RunCounters {
        seen: 10,
        skipped: 4,
        analyzed: 5,
        failed: 1,
    };
    complete_analysis_run(&pool, run.id, counters).await.unwrap();

    let stored = get_analysis_run(&pool, run.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "succeeded");
    assert_eq!(stored.items_seen, 10);
    assert_eq!(stored.items_analyzed, 5);

    // A completed run cannot be failed afterwards.
    let err = fail_analysis_run(&pool, run.id, "late").await.unwrap_err();
    assert!(matches!(err, DbError::InvalidRunTransition { .. }));
}
