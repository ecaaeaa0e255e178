//! Inference client for a locally hosted, Ollama-compatible text-generation
//! endpoint.
//!
//! One call: [`OllamaClient::generate`] sends a prompt (plus optional system
//! message) and returns the completion text. The client is stateless and
//! carries no retry logic — retry policy differs by pipeline stage and lives
//! with the orchestrator.

mod client;
mod error;

pub use client::OllamaClient;
pub use error::LlmError;
