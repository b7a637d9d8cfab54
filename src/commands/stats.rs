use crate::commands::StatsReport;
use crate::error::{Result, VaultError};
use crate::store::LibraryStore;
use std::collections::HashSet;

/// Count-level overview of a library, echoing its metadata timestamps.
pub fn run<S: LibraryStore>(store: &S, name: &str) -> Result<StatsReport> {
    let library = store
        .load(name.trim())?
        .ok_or_else(|| VaultError::LibraryMissing(name.trim().to_string()))?;

    let unique_generation_ids = library
        .prompts
        .iter()
        .map(|record| record.generation_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    Ok(StatsReport {
        total_prompts: library.prompts.len(),
        created: library.metadata.created.clone(),
        last_updated: library.metadata.last_updated.clone(),
        unique_generation_ids,
        tagged_prompts: library
            .prompts
            .iter()
            .filter(|record| !record.tags.is_empty())
            .count(),
        prompts_with_notes: library
            .prompts
            .iter()
            .filter(|record| record.notes.is_some())
            .count(),
    })
}
