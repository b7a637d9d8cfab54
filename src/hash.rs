//! Content hashing for change detection and duplicate checks.
//!
//! Hashes are always computed over the *trimmed* prompt text, so two
//! records that differ only in surrounding whitespace compare equal.
//! The full hex digest is used for comparisons; the stored
//! `content_hash` field keeps only a short prefix for readability.

use sha2::{Digest, Sha256};

/// Length of the short hash stored on records.
pub const SHORT_HASH_LEN: usize = 8;

/// Full hex digest of the trimmed text. Used for equality and dedup.
pub fn full_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Short form of [`full_hash`], as persisted on records.
pub fn short_hash(text: &str) -> String {
    let mut digest = full_hash(text);
    digest.truncate(SHORT_HASH_LEN);
    digest
}
