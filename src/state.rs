//! Explicit owner of all process-lifetime mutable state.
//!
//! The host keeps one `SessionState` per node session and passes it
//! into the facade; nothing here is global. Dropping it (end of
//! process, or per test) discards the caches; none of this state is
//! persisted, so change detection starts over on restart.

use crate::cache::SummaryCache;
use std::collections::HashMap;
use std::path::PathBuf;

/// What the last persisted save to a library looked like. The writer
/// echoes this back when an unchanged prompt is offered again.
#[derive(Debug, Clone)]
pub struct SavedMark {
    pub content_hash: String,
    pub generation_id: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct SessionState {
    /// Rendered dropdown lists, keyed by listing parameters.
    pub summaries: SummaryCache,
    /// Last persisted content per library, for change detection across
    /// repeated save calls in one session.
    last_saved: HashMap<String, SavedMark>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_mark(&self, library: &str) -> Option<&SavedMark> {
        self.last_saved.get(library)
    }

    pub fn note_saved(&mut self, library: &str, mark: SavedMark) {
        self.last_saved.insert(library.to_string(), mark);
    }
}
