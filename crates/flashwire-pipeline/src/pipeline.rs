//! Pipeline orchestration: dedup, per-stage enrichment, failure handling,
//! and the worker-pool drivers.

use futures::stream::{self, StreamExt};

use flashwire_core::{content_fingerprint, NewsItem, ProcessingStage};
use flashwire_db::DbError;

use crate::analyzer::FinancialAnalyzer;
use crate::classifier::Classifier;
use crate::error::PipelineError;
use crate::generate::TextGenerator;
use crate::retry::run_stage_with_retry;
use crate::store::{NewsStore, StoredRecord};
use crate::types::{ItemOutcome, PipelineConfig, RunSummary};

/// Process one raw item end to end.
///
/// 1. Fingerprint the content; an existing record is a duplicate skip.
/// 2. Insert; losing the insert race ([`DbError::Duplicate`]) is equally a
///    skip, never an error.
/// 3. Enrich through classification and financial analysis.
///
/// # Errors
///
/// Returns [`PipelineError::Db`] only for store failures before the record
/// exists. Once inserted, stage failures are absorbed: the record is marked
/// `failed` and the outcome is [`ItemOutcome::Failed`].
pub async fn process_item<S: NewsStore, G: TextGenerator>(
    store: &S,
    generator: &G,
    config: &PipelineConfig,
    item: &NewsItem,
) -> Result<ItemOutcome, PipelineError> {
    let fingerprint = content_fingerprint(&item.content);

    if store.record_exists(&fingerprint).await? {
        tracing::debug!(fingerprint = %fingerprint, "duplicate headline — skipping");
        return Ok(ItemOutcome::Skipped);
    }

    let record = match store
        .insert_record(&fingerprint, &item.content, item.published_at)
        .await
    {
        Ok(record) => record,
        Err(DbError::Duplicate) => {
            tracing::debug!(fingerprint = %fingerprint, "lost insert race — skipping duplicate");
            return Ok(ItemOutcome::Skipped);
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(id = record.id, fingerprint = %fingerprint, "new record ingested");
    enrich_record(store, generator, config, &record).await
}

/// Drive a stored record from its current stage to `analyzed`.
///
/// Resumes at the first incomplete stage: an `ingested` record is
/// classified then analyzed, a `classified` record is analyzed only.
/// Records already terminal (`analyzed`, `failed`) are skipped untouched.
///
/// Each stage runs under its own retry policy; exhaustion marks the record
/// `failed` with the last error's kind, preserving enrichment persisted by
/// earlier stages.
///
/// # Errors
///
/// Stage failures are absorbed into [`ItemOutcome::Failed`]; this only
/// returns `Err` if marking the record failed is itself impossible — and
/// even that is logged and absorbed, so the current implementation always
/// returns `Ok`.
pub async fn enrich_record<S: NewsStore, G: TextGenerator>(
    store: &S,
    generator: &G,
    config: &PipelineConfig,
    record: &StoredRecord,
) -> Result<ItemOutcome, PipelineError> {
    let mut stage = record.stage;

    if stage == ProcessingStage::Ingested {
        let classifier = Classifier::new(generator, config.classify_timeout);
        let classifier = &classifier;
        let record_id = record.id;
        let content = record.content.as_str();

        let outcome = run_stage_with_retry(config.classify_retry, "classification", move || {
            async move {
                let classification = classifier.classify(content).await?;
                store
                    .update_classification(
                        record_id,
                        classification.attribute(),
                        classification.category_str(),
                    )
                    .await?;
                Ok(classification)
            }
        })
        .await;

        match outcome {
            Ok(classification) => {
                tracing::info!(
                    id = record.id,
                    attribute = %classification.attribute(),
                    category = classification.category_str(),
                    "record classified"
                );
                stage = ProcessingStage::Classified;
            }
            Err(err) => return Ok(fail_record(store, record.id, "classification", &err).await),
        }
    }

    if stage == ProcessingStage::Classified {
        let analyzer = FinancialAnalyzer::new(generator, config.analyze_timeout);
        let analyzer = &analyzer;
        let record_id = record.id;
        let content = record.content.as_str();

        let outcome = run_stage_with_retry(config.analyze_retry, "analysis", move || {
            async move {
                let impact = analyzer.analyze(content).await?;
                store.update_financial_analysis(record_id, &impact).await?;
                Ok(impact)
            }
        })
        .await;

        match outcome {
            Ok(impact) => {
                tracing::info!(
                    id = record.id,
                    industries = impact.industries.len(),
                    instruments = impact.instruments.len(),
                    strength = %impact.strength,
                    "record analyzed"
                );
                return Ok(ItemOutcome::Analyzed);
            }
            Err(err) => return Ok(fail_record(store, record.id, "analysis", &err).await),
        }
    }

    // Analyzed or failed already — re-running the pipeline is a no-op.
    tracing::debug!(id = record.id, stage = %stage, "record already terminal — skipping");
    Ok(ItemOutcome::Skipped)
}

/// Mark a record terminally failed after a stage exhausted its retries.
/// Best-effort: a failure to mark is logged, never propagated.
async fn fail_record<S: NewsStore>(
    store: &S,
    id: i64,
    stage: &'static str,
    err: &PipelineError,
) -> ItemOutcome {
    tracing::error!(id, stage, error = %err, "stage retries exhausted — marking record failed");
    let reason = format!("{stage}: {err}");
    if let Err(mark_err) = store.mark_failed(id, &reason).await {
        tracing::error!(id, error = %mark_err, "could not mark record as failed");
    }
    ItemOutcome::Failed
}

/// Process one scrape cycle's items with bounded concurrency.
///
/// Items are independent; the store's unique fingerprint constraint
/// serializes racing inserts. Per-item errors are logged and tallied as
/// failures — no single item aborts the batch.
pub async fn run_items<S: NewsStore, G: TextGenerator>(
    store: &S,
    generator: &G,
    config: &PipelineConfig,
    items: Vec<NewsItem>,
) -> RunSummary {
    let max_concurrent = config.max_concurrent_items.max(1);

    let outcomes: Vec<ItemOutcome> = stream::iter(items)
        .map(|item| async move {
            match process_item(store, generator, config, &item).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(error = %err, "unexpected error processing item");
                    ItemOutcome::Failed
                }
            }
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let mut summary = RunSummary::default();
    for outcome in outcomes {
        summary.tally(outcome);
    }
    summary
}

/// Resume enrichment over the stored backlog.
///
/// Only records at `ingested` or `classified` are listed and touched;
/// `analyzed` and `failed` records stay untouched, which is what makes
/// repeated invocations idempotent.
///
/// # Errors
///
/// Returns [`PipelineError::Db`] if the backlog cannot be listed.
pub async fn run_backlog<S: NewsStore, G: TextGenerator>(
    store: &S,
    generator: &G,
    config: &PipelineConfig,
    limit: i64,
) -> Result<RunSummary, PipelineError> {
    let records = store.list_unfinished(limit).await?;
    tracing::info!(count = records.len(), "resuming unfinished records");

    let max_concurrent = config.max_concurrent_items.max(1);

    let outcomes: Vec<ItemOutcome> = stream::iter(records)
        .map(|record| async move {
            match enrich_record(store, generator, config, &record).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(id = record.id, error = %err, "unexpected error resuming record");
                    ItemOutcome::Failed
                }
            }
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let mut summary = RunSummary::default();
    for outcome in outcomes {
        summary.tally(outcome);
    }
    Ok(summary)
}
