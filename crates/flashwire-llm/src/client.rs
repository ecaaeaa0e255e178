//! HTTP client for the Ollama `/api/generate` endpoint.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for an Ollama-compatible text-generation endpoint.
///
/// Manages the HTTP client, base URL, and model identifier. Point `base_url`
/// at a mock server in tests. Timeouts are per-request: the caller supplies
/// one to every [`generate`](OllamaClient::generate) call since classification
/// and financial analysis run under different budgets.
pub struct OllamaClient {
    client: Client,
    base_url: Url,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    /// Creates a new client for the given endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidUrl`] if `base_url` does not parse, or
    /// [`LlmError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(base_url: &str, model: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends the API path instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| LlmError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            model: model.to_owned(),
        })
    }

    /// Sends one generation request and returns the trimmed completion text.
    ///
    /// The request body is `{model, prompt, system?, stream: false}`; the
    /// completion is read from the `response` field of the reply.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Http`] on connection failure or when `timeout` elapses.
    /// - [`LlmError::UnexpectedStatus`] on a non-2xx response.
    /// - [`LlmError::Deserialize`] if the body is not the expected JSON shape.
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let url = self.base_url.join("api/generate").map_err(|e| {
            LlmError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let response = self
            .client
            .post(url.clone())
            .timeout(timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        let payload: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Deserialize {
                context: format!("generate(model={})", self.model),
                source: e,
            })?;

        Ok(payload.response.trim().to_owned())
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}
