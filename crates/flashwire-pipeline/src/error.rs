use flashwire_db::DbError;
use flashwire_llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transport-level inference failure (timeout, connection, bad status).
    #[error("inference error: {0}")]
    Llm(#[from] LlmError),

    /// The model answered, but not with a usable attribute or category.
    #[error("classification error: {0}")]
    Classification(String),

    /// The model answered, but the impact response carried none of the
    /// expected labels.
    #[error("financial analysis error: {0}")]
    Analysis(String),

    #[error("store error: {0}")]
    Db(#[from] DbError),
}

impl PipelineError {
    /// Short stable name of the error kind, used in `failure_reason`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Llm(_) => "inference",
            PipelineError::Classification(_) => "classification",
            PipelineError::Analysis(_) => "analysis",
            PipelineError::Db(_) => "store",
        }
    }
}
