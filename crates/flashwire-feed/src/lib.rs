//! Flash-feed scraper for flashwire.
//!
//! Fetches the configured feed page over HTTP and extracts flash headlines
//! with their `HH:MM:SS` item times, producing the `NewsItem` sequence the
//! pipeline consumes. One call is one scrape cycle: a lazy, finite batch,
//! restartable on the next cycle.

mod client;
mod error;
mod extract;

pub use client::FeedClient;
pub use error::FeedError;
pub use extract::{extract_flash_items, parse_item_time};
