use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash;

/// Current time as the fixed-width RFC 3339 form used everywhere in
/// library files. Fixed precision keeps lexicographic order equal to
/// chronological order.
pub fn now_stamp() -> String {
    format_stamp(Utc::now())
}

pub fn format_stamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Length of generated generation-id tokens.
pub const TOKEN_LEN: usize = 8;

/// A short random token correlating a prompt with a generation event,
/// for callers that don't supply their own id.
pub fn generation_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(TOKEN_LEN);
    token
}

/// One saved prompt entry in a library.
///
/// Timestamps are kept as ISO-8601 strings rather than parsed dates so
/// that hand-edited or legacy files with odd timestamps still load;
/// sorting is lexicographic, which matches chronological order for
/// well-formed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub generation_id: String,
    #[serde(default)]
    pub content_hash: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PromptRecord {
    /// Build a record for `text` stamped with the current time.
    pub fn new(text: String, generation_id: String) -> Self {
        Self {
            content_hash: hash::short_hash(&text),
            text,
            timestamp: now_stamp(),
            generation_id,
            tags: Vec::new(),
            notes: None,
        }
    }

    /// Creation time, if the stored timestamp is parseable.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Parse the timestamp shapes found in libraries: RFC 3339, bare ISO
/// without an offset, and the legacy `YYYY-MM-DD HH:MM:SS` form.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Per-library bookkeeping, rewritten on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryMeta {
    pub created: String,
    pub total_prompts: usize,
    pub last_updated: String,
}

impl Default for LibraryMeta {
    fn default() -> Self {
        let now = now_stamp();
        Self {
            created: now.clone(),
            total_prompts: 0,
            last_updated: now,
        }
    }
}

/// A named, file-backed collection of prompt records.
///
/// Records are append-ordered and never mutated in place. The metadata
/// counter is recomputed by [`Library::push`] and [`Library::touch`] so
/// `total_prompts` always equals the record count after a write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub metadata: LibraryMeta,
    #[serde(default)]
    pub prompts: Vec<PromptRecord>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and bring the metadata up to date.
    pub fn push(&mut self, record: PromptRecord) {
        self.prompts.push(record);
        self.touch();
    }

    /// Recompute the prompt count and bump `last_updated`.
    pub fn touch(&mut self) {
        self.metadata.total_prompts = self.prompts.len();
        self.metadata.last_updated = now_stamp();
    }
}
