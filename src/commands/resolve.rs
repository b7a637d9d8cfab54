use crate::commands::list::EMPTY_LIBRARY;
use crate::commands::ListQuery;
use crate::error::{Result, VaultError};
use crate::model::PromptRecord;
use crate::query::select;
use crate::store::LibraryStore;
use crate::summary::parse_index;

/// Map a rendered summary line back to its record by re-running the
/// same filter+sort+limit pipeline the listing used.
///
/// The index is positional, not a stable key: callers must pass the
/// same query parameters the listing was produced with, or the index
/// lands on a different record. That fragility is contractual: hosts
/// hold on to dropdown strings across invocations.
// TODO: embed the generation_id in the rendered line and resolve by it,
// falling back to the index for lines rendered by older versions.
pub fn run<S: LibraryStore>(
    store: &S,
    query: &ListQuery,
    selection: &str,
) -> Result<Option<PromptRecord>> {
    if selection.trim().is_empty() || selection == EMPTY_LIBRARY {
        return Ok(None);
    }

    let Some(index) = parse_index(selection) else {
        // a bracketed line with a mangled index is a malformed
        // selection; anything else is just not a selection at all
        if selection.trim_start().starts_with('[') {
            return Err(VaultError::Selection(format!(
                "no index in selection: {}",
                selection
            )));
        }
        return Ok(None);
    };

    let Some(library) = store.load(query.library.trim())? else {
        return Ok(None);
    };

    let selected = select(&library.prompts, query.filter, query.limit, &query.search);
    Ok(index
        .checked_sub(1)
        .and_then(|i| selected.get(i))
        .map(|record| (*record).clone()))
}
