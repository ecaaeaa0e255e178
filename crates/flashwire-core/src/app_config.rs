use std::time::Duration;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    /// Flash-feed page URL. Optional so that `migrate`/`resume` work
    /// without a feed configured; `ingest` requires it.
    pub feed_url: Option<String>,
    pub feed_timeout_secs: u64,
    pub feed_window_minutes: i64,
    pub feed_user_agent: String,

    pub ollama_url: String,
    pub ollama_model: String,

    pub classify_timeout_secs: u64,
    pub analyze_timeout_secs: u64,
    pub classify_max_retries: u32,
    pub analyze_max_retries: u32,
    pub max_reprompts: u32,
    pub retry_backoff_base_ms: u64,

    pub max_concurrent_items: usize,
}

impl AppConfig {
    #[must_use]
    pub fn classify_timeout(&self) -> Duration {
        Duration::from_secs(self.classify_timeout_secs)
    }

    #[must_use]
    pub fn analyze_timeout(&self) -> Duration {
        Duration::from_secs(self.analyze_timeout_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("feed_url", &self.feed_url)
            .field("feed_timeout_secs", &self.feed_timeout_secs)
            .field("feed_window_minutes", &self.feed_window_minutes)
            .field("feed_user_agent", &self.feed_user_agent)
            .field("ollama_url", &self.ollama_url)
            .field("ollama_model", &self.ollama_model)
            .field("classify_timeout_secs", &self.classify_timeout_secs)
            .field("analyze_timeout_secs", &self.analyze_timeout_secs)
            .field("classify_max_retries", &self.classify_max_retries)
            .field("analyze_max_retries", &self.analyze_max_retries)
            .field("max_reprompts", &self.max_reprompts)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("max_concurrent_items", &self.max_concurrent_items)
            .finish()
    }
}
