//! Content fingerprinting for deduplication.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the raw headline text.
///
/// The fingerprint is the dedup key: one `news_records` row exists per
/// distinct fingerprint, enforced by a unique constraint at the store.
#[must_use]
pub fn content_fingerprint(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}
