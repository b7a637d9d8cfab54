use crate::commands::DedupeReport;
use crate::error::{Result, VaultError};
use crate::hash;
use crate::store::LibraryStore;
use std::collections::HashSet;

/// Collapse a library to the first occurrence of each content hash,
/// preserving the original order, and rewrite it. Idempotent: a second
/// run removes nothing.
pub fn run<S: LibraryStore>(store: &mut S, name: &str) -> Result<DedupeReport> {
    let name = name.trim();
    let mut library = store
        .load(name)?
        .ok_or_else(|| VaultError::LibraryMissing(name.to_string()))?;

    let before = library.prompts.len();
    let mut seen = HashSet::new();
    library
        .prompts
        .retain(|record| seen.insert(hash::full_hash(&record.text)));

    let removed = before - library.prompts.len();
    if removed > 0 {
        library.touch();
        store.save(name, &library)?;
        log::info!("removed {} duplicate prompts from {}", removed, name);
    }

    Ok(DedupeReport {
        removed,
        remaining: library.prompts.len(),
    })
}
