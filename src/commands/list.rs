use crate::cache::CacheKey;
use crate::commands::ListQuery;
use crate::config::VaultConfig;
use crate::query::select;
use crate::state::SessionState;
use crate::store::LibraryStore;
use crate::summary::render_line;

/// Dropdown entry shown when a library has no file or no records.
pub const EMPTY_LIBRARY: &str = "Empty Library";

/// Render the summary list for a query, via the session cache.
///
/// Never fails: a missing file yields the [`EMPTY_LIBRARY`] sentinel,
/// and read or parse failures yield a single `Error: ...` line which
/// is cached like any other result, staying until the file's
/// modification time changes, rather than re-reading a broken file on
/// every host poll.
pub fn run<S: LibraryStore>(
    store: &S,
    state: &mut SessionState,
    config: &VaultConfig,
    query: &ListQuery,
) -> Vec<String> {
    let library = query.library.trim();
    if library.is_empty() {
        return vec![EMPTY_LIBRARY.to_string()];
    }

    let mtime = store.mtime(library);
    if mtime.is_none() {
        return vec![EMPTY_LIBRARY.to_string()];
    }

    let key = CacheKey {
        library: library.to_string(),
        filter: query.filter,
        limit: query.limit,
        search: query.search.clone(),
    };
    if let Some(lines) = state.summaries.get(&key, mtime) {
        return lines.to_vec();
    }

    let lines = match store.load(library) {
        Ok(Some(lib)) => {
            let selected = select(&lib.prompts, query.filter, query.limit, &query.search);
            if selected.is_empty() {
                vec![EMPTY_LIBRARY.to_string()]
            } else {
                selected
                    .iter()
                    .enumerate()
                    .map(|(i, record)| render_line(i + 1, record, config))
                    .collect()
            }
        }
        Ok(None) => vec![EMPTY_LIBRARY.to_string()],
        Err(e) => {
            log::warn!("failed to read library {}: {}", library, e);
            vec![format!("Error: {}", e)]
        }
    };

    state.summaries.insert(key, lines.clone(), mtime);
    lines
}
