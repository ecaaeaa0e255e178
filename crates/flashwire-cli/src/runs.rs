//! Helpers for the `analysis_runs` ledger around a pipeline invocation.

use flashwire_db::RunCounters;
use flashwire_pipeline::RunSummary;
use sqlx::PgPool;

/// Mark a run failed, logging rather than propagating any error — the
/// original failure is what the caller reports.
pub(crate) async fn fail_run_best_effort(pool: &PgPool, run_id: i64, message: String) {
    if let Err(err) = flashwire_db::fail_analysis_run(pool, run_id, &message).await {
        tracing::error!(run_id, error = %err, "could not mark analysis run as failed");
    }
}

pub(crate) fn counters_from_summary(summary: RunSummary) -> RunCounters {
    RunCounters {
        seen: clamp_count(summary.seen),
        skipped: clamp_count(summary.skipped),
        analyzed: clamp_count(summary.analyzed),
        failed: clamp_count(summary.failed),
    }
}

fn clamp_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
