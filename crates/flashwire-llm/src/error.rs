use thiserror::Error;

/// Errors returned by the inference client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network or TLS failure, including per-request timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not a valid URL.
    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
