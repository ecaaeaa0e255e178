//! Configuration and outcome types for pipeline runs.

use std::time::Duration;

use flashwire_core::AppConfig;

/// Per-stage retry budgets.
///
/// `max_retries` bounds transient inference failures (timeout, connection,
/// 5xx), each retried after exponential back-off. `max_reprompts` bounds
/// content-level failures (unparseable or out-of-vocabulary model output),
/// re-prompted immediately — the model may answer differently — and then
/// terminal.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub max_reprompts: u32,
    /// Base delay for exponential back-off: `backoff_base_ms * 2^(n-1)` ms
    /// before the n-th retry, ±25% jitter, capped at 60s.
    pub backoff_base_ms: u64,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub classify_timeout: Duration,
    pub analyze_timeout: Duration,
    pub classify_retry: RetryPolicy,
    pub analyze_retry: RetryPolicy,
    pub max_concurrent_items: usize,
}

impl PipelineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            classify_timeout: config.classify_timeout(),
            analyze_timeout: config.analyze_timeout(),
            classify_retry: RetryPolicy {
                max_retries: config.classify_max_retries,
                max_reprompts: config.max_reprompts,
                backoff_base_ms: config.retry_backoff_base_ms,
            },
            analyze_retry: RetryPolicy {
                max_retries: config.analyze_max_retries,
                max_reprompts: config.max_reprompts,
                backoff_base_ms: config.retry_backoff_base_ms,
            },
            max_concurrent_items: config.max_concurrent_items,
        }
    }
}

/// Outcome of one item's trip through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Already stored (or lost an insert race) — nothing to do.
    Skipped,
    /// Fully enriched, record at `analyzed`.
    Analyzed,
    /// Retries exhausted; record marked `failed` at its last completed stage.
    Failed,
}

/// Aggregated per-run counts. No single item failure aborts a run; the run
/// reports this summary instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub seen: usize,
    pub skipped: usize,
    pub analyzed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub(crate) fn tally(&mut self, outcome: ItemOutcome) {
        self.seen += 1;
        match outcome {
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Analyzed => self.analyzed += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}
