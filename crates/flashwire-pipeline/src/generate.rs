//! Text-generation seam between the pipeline and the inference endpoint.

use std::time::Duration;

use async_trait::async_trait;
use flashwire_llm::{LlmError, OllamaClient};

/// A text-generation backend: one prompt in, one completion out.
///
/// Production uses [`OllamaClient`]; tests script replies.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        timeout: Duration,
    ) -> Result<String, LlmError>;
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        OllamaClient::generate(self, prompt, system, timeout).await
    }
}
