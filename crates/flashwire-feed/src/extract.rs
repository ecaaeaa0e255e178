//! Regex extraction of flash items from the feed's HTML.
//!
//! The feed renders each flash as a pair of sibling blocks: one carrying an
//! `item-time` class with the source-local `HH:MM:SS` time, one carrying a
//! `flash-text` class with the headline. Times are combined with the scrape
//! date; a time ahead of "now" by more than an hour is assumed to belong to
//! the previous day (midnight rollover during a scrape).

use chrono::{DateTime, Duration, NaiveTime, Utc};
use regex::Regex;

use flashwire_core::NewsItem;

/// Items whose combined timestamp is ahead of `now` by more than this are
/// shifted back one day.
const ROLLOVER_SLACK_HOURS: i64 = 1;

/// Extract `(time, text)` flash pairs from the page and produce [`NewsItem`]s
/// stamped against `now`'s date.
///
/// Items with an unparseable time or empty text are dropped. The result
/// preserves page order.
#[must_use]
pub fn extract_flash_items(html: &str, now: DateTime<Utc>) -> Vec<NewsItem> {
    let times = capture_class_blocks(html, "item-time");
    let texts = capture_class_blocks(html, "flash-text");

    if times.is_empty() || texts.is_empty() {
        return Vec::new();
    }

    times
        .iter()
        .zip(texts.iter())
        .filter_map(|(time_html, text_html)| {
            let content = clean_text(text_html);
            if content.is_empty() {
                return None;
            }
            let published_at = parse_item_time(&clean_text(time_html), now)?;
            Some(NewsItem {
                content,
                published_at,
            })
        })
        .collect()
}

/// Parse a source `HH:MM:SS` time string against the scrape instant's date.
///
/// Returns `None` for malformed times. Applies the midnight-rollover guard:
/// a combined timestamp more than [`ROLLOVER_SLACK_HOURS`] ahead of `now`
/// is moved back one day.
#[must_use]
pub fn parse_item_time(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S").ok()?;
    let candidate = now.date_naive().and_time(time).and_utc();

    if candidate - now > Duration::hours(ROLLOVER_SLACK_HOURS) {
        Some(candidate - Duration::days(1))
    } else {
        Some(candidate)
    }
}

/// Capture the inner HTML of every `<div>` whose class attribute contains
/// `class_name`.
fn capture_class_blocks(html: &str, class_name: &str) -> Vec<String> {
    let pattern = format!(
        r#"(?is)<div[^>]*class\s*=\s*["'][^"']*{class_name}[^"']*["'][^>]*>(.*?)</div>"#
    );
    let re = Regex::new(&pattern).expect("valid class-block regex");
    re.captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Strip tags, decode the common entities, and collapse whitespace.
fn clean_text(input: &str) -> String {
    let tags = Regex::new(r"(?is)<[^>]+>").expect("valid tags regex");
    let no_tags = tags.replace_all(input, " ");
    let decoded = no_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
