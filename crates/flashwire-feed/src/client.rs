//! HTTP client for the flash-feed page.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;

use flashwire_core::NewsItem;

use crate::error::FeedError;
use crate::extract::extract_flash_items;

/// Client for one flash-feed page.
///
/// The feed serves server-rendered HTML and expects a browser-like
/// `User-Agent`; non-browser agents get an empty shell page.
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Creates a `FeedClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches one scrape cycle of flash items.
    ///
    /// Downloads the page, extracts `(content, published_at)` pairs, and
    /// keeps only items published within the last `window_minutes` relative
    /// to `now`. A `window_minutes` of zero or less disables the filter.
    ///
    /// # Errors
    ///
    /// - [`FeedError::UnexpectedStatus`] on a non-2xx response.
    /// - [`FeedError::Http`] on network failure or timeout.
    pub async fn fetch_flash_items(
        &self,
        feed_url: &str,
        window_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<NewsItem>, FeedError> {
        let response = self.client.get(feed_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url: feed_url.to_owned(),
            });
        }

        let html = response.text().await?;
        let extracted = extract_flash_items(&html, now);
        let extracted_count = extracted.len();

        let items: Vec<NewsItem> = if window_minutes > 0 {
            let cutoff = now - chrono::Duration::minutes(window_minutes);
            extracted
                .into_iter()
                .filter(|item| item.published_at >= cutoff)
                .collect()
        } else {
            extracted
        };

        tracing::debug!(
            url = feed_url,
            extracted = extracted_count,
            kept = items.len(),
            window_minutes,
            "scrape cycle complete"
        );

        Ok(items)
    }
}
