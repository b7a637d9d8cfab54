//! Business logic, one module per operation.
//!
//! Commands operate on a [`LibraryStore`](crate::store::LibraryStore)
//! and plain Rust types, return `Result`s, and never format for the
//! host; sentinel-string conversion happens in the API facade. The
//! one exception is [`list`], whose sentinel lines are part of the
//! cache contract and therefore produced here.

use crate::query::{FilterMode, SearchScope};
use serde::Serialize;
use std::path::PathBuf;

pub mod backup;
pub mod dedupe;
pub mod import;
pub mod list;
pub mod resolve;
pub mod save;
pub mod search;
pub mod stats;

/// Parameters of one listing, also the identity of its cache entry.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub library: String,
    pub filter: FilterMode,
    pub limit: usize,
    pub search: String,
}

impl ListQuery {
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            filter: FilterMode::Recent,
            limit: 20,
            search: String::new(),
        }
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

/// A save call as the writer sees it: `generation_id` is already the
/// effective one (caller-supplied or freshly generated).
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub library: String,
    pub text: String,
    pub enabled: bool,
    pub force: bool,
    pub generation_id: String,
    pub tags: String,
    pub notes: String,
}

/// What the writer decided and did.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub saved: bool,
    /// Effective id: the appended record's, or the duplicate's when the
    /// save was skipped in its favor.
    pub generation_id: String,
    pub path: Option<PathBuf>,
    pub duplicate: bool,
}

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub library: String,
    pub term: String,
    pub scope: SearchScope,
    pub limit: usize,
}

/// Library statistics; serialized to YAML for the host details output.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub total_prompts: usize,
    pub created: String,
    pub last_updated: String,
    pub unique_generation_ids: usize,
    pub tagged_prompts: usize,
    pub prompts_with_notes: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct DedupeReport {
    pub removed: usize,
    pub remaining: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}
