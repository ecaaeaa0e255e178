//! Ingestion-and-enrichment pipeline for flashwire.
//!
//! Takes raw scraped headlines, deduplicates them against the store by
//! content fingerprint, drives each record through fact/opinion
//! classification and financial-impact analysis via model calls, and
//! persists one stage at a time so that a crash, restart, or partial
//! failure resumes from stored state:
//!
//! ```text
//! ingested --classify--> classified --analyze--> analyzed
//! ingested/classified --(retries exhausted)--> failed
//! ```
//!
//! Store and model access go through the [`NewsStore`] and
//! [`TextGenerator`] seams, so the whole state machine is testable without
//! Postgres or a model endpoint.

pub mod analyzer;
pub mod classifier;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod store;
pub mod types;

mod retry;

pub use analyzer::FinancialAnalyzer;
pub use classifier::Classifier;
pub use error::PipelineError;
pub use generate::TextGenerator;
pub use pipeline::{enrich_record, process_item, run_backlog, run_items};
pub use store::{NewsStore, PgNewsStore, StoredRecord};
pub use types::{ItemOutcome, PipelineConfig, RetryPolicy, RunSummary};
