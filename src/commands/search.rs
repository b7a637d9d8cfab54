use crate::commands::SearchQuery;
use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::query::matches_in_scope;
use crate::store::LibraryStore;
use crate::summary::preview;

/// Field-scoped search over a whole library, in file order.
///
/// Returns up to `limit` rendered match lines. Unlike the dropdown
/// listing this is not cached and not sorted; it is a one-shot lookup
/// tool, and its lines are not resolvable selections.
pub fn run<S: LibraryStore>(
    store: &S,
    config: &VaultConfig,
    query: &SearchQuery,
) -> Result<Vec<String>> {
    let library = store
        .load(query.library.trim())?
        .ok_or_else(|| VaultError::LibraryMissing(query.library.trim().to_string()))?;

    let mut lines = Vec::new();
    for record in &library.prompts {
        if !matches_in_scope(record, &query.term, query.scope) {
            continue;
        }

        let id: String = record.generation_id.chars().take(8).collect();
        lines.push(format!(
            "[{}] {} {}",
            lines.len() + 1,
            id,
            preview(&record.text, config.preview_budget)
        ));

        if lines.len() >= query.limit {
            break;
        }
    }
    Ok(lines)
}
