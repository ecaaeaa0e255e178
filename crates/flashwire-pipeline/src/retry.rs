//! Per-stage retry with exponential back-off and jitter.
//!
//! [`run_stage_with_retry`] wraps one pipeline stage (model call(s) plus the
//! stage's store write) and retries on transient errors. Content-level
//! errors — the model answered, but unusably — get a small separate
//! re-prompt budget without back-off. Terminal errors (store invariant
//! violations, config errors) are returned immediately.

use std::future::Future;
use std::time::Duration;

use flashwire_db::DbError;
use flashwire_llm::LlmError;

use crate::error::PipelineError;
use crate::types::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorClass {
    /// Worth retrying after a back-off delay: timeouts, connection
    /// failures, 5xx/429 from the endpoint, pool exhaustion.
    Transient,
    /// The model responded with unusable content; a re-prompt may succeed.
    Reprompt,
    /// Retrying cannot help: duplicate, vanished record, config error.
    Terminal,
}

pub(crate) fn classify_error(err: &PipelineError) -> ErrorClass {
    match err {
        PipelineError::Llm(llm) => match llm {
            // Send-level failures (timeout, connect, reset) are transient.
            LlmError::Http(_) => ErrorClass::Transient,
            LlmError::UnexpectedStatus { status, .. } => {
                if *status >= 500 || *status == 429 {
                    ErrorClass::Transient
                } else {
                    ErrorClass::Terminal
                }
            }
            // The endpoint broke its response contract; a fresh call may
            // come back well-formed.
            LlmError::Deserialize { .. } => ErrorClass::Transient,
            LlmError::InvalidUrl { .. } => ErrorClass::Terminal,
        },
        PipelineError::Classification(_) | PipelineError::Analysis(_) => ErrorClass::Reprompt,
        PipelineError::Db(db) => match db {
            DbError::Sqlx(sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut) => ErrorClass::Transient,
            _ => ErrorClass::Terminal,
        },
    }
}

/// Runs `operation` under the stage's [`RetryPolicy`].
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Retry | Sleep before it              |
/// |-------|------------------------------|
/// | 1     | 1 000 ms × 2⁰ ± 25 % jitter |
/// | 2     | 1 000 ms × 2¹ ± 25 % jitter |
/// | 3     | 1 000 ms × 2² ± 25 % jitter |
///
/// Delay is capped at 60 s. Re-prompts (content-level failures) sleep not
/// at all and are budgeted separately from transient retries.
pub(crate) async fn run_stage_with_retry<T, F, Fut>(
    policy: RetryPolicy,
    stage: &'static str,
    mut operation: F,
) -> Result<T, PipelineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;

    let mut transient_attempts = 0u32;
    let mut reprompts = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match classify_error(&err) {
            ErrorClass::Terminal => return Err(err),
            ErrorClass::Reprompt => {
                if reprompts >= policy.max_reprompts {
                    return Err(err);
                }
                reprompts += 1;
                tracing::warn!(
                    stage,
                    reprompt = reprompts,
                    max_reprompts = policy.max_reprompts,
                    error = %err,
                    "unusable model output — re-prompting"
                );
            }
            ErrorClass::Transient => {
                if transient_attempts >= policy.max_retries {
                    return Err(err);
                }
                transient_attempts += 1;
                let computed = policy
                    .backoff_base_ms
                    .saturating_mul(1u64 << (transient_attempts - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    stage,
                    attempt = transient_attempts,
                    max_retries = policy.max_retries,
                    delay_ms,
                    error = %err,
                    "transient error — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
