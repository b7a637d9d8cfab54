//! # Host-facing facade
//!
//! [`PromptVault`] is the single entry point for node implementations.
//! It owns the store and the session state, dispatches to the command
//! layer, and (unlike that layer) never returns an error: every
//! failure is converted to the sentinel string outputs the host
//! renders, with diagnostic detail going to the `log` stream. A host
//! runtime treats these nodes as infallible glue; a crash or a raised
//! error would take the whole graph evaluation down with it.
//!
//! Generic over [`LibraryStore`] so the same facade runs against the
//! YAML store in production and the memory store in tests.

use crate::commands::{self, ListQuery, SaveRequest, SearchQuery};
use crate::config::VaultConfig;
use crate::error::VaultError;
use crate::model::generation_token;
use crate::state::SessionState;
use crate::store::yaml::YamlStore;
use crate::store::LibraryStore;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub use crate::commands::list::EMPTY_LIBRARY;

/// Dropdown entry when the archive root holds no library files.
pub const NO_LIBRARIES: &str = "No libraries found";

/// Outputs of the load node. All strings, matching the host's socket
/// types; everything empty when nothing resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutput {
    pub prompt: String,
    pub generation_id: String,
    pub timestamp: String,
    /// Comma-joined tag list.
    pub tags: String,
    pub notes: String,
}

/// Outputs of the save node. `prompt` echoes the input so the node can
/// sit inline in a workflow; `file_path` is empty when nothing was
/// written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutput {
    pub prompt: String,
    pub generation_id: String,
    pub file_path: String,
}

/// Maintenance actions of the manager node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageAction {
    Stats,
    Deduplicate,
    Backup,
}

impl ManageAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "stats" => Some(ManageAction::Stats),
            "deduplicate" => Some(ManageAction::Deduplicate),
            "backup" => Some(ManageAction::Backup),
            _ => None,
        }
    }
}

pub struct PromptVault<S: LibraryStore> {
    store: S,
    state: SessionState,
    config: VaultConfig,
}

impl PromptVault<YamlStore> {
    /// Open an archive rooted at `root`, picking up its `config.json`
    /// when present.
    pub fn open<P: Into<PathBuf>>(root: P) -> Self {
        let store = YamlStore::new(root);
        let config = VaultConfig::load(store.root()).unwrap_or_else(|e| {
            log::warn!("unreadable config.json, using defaults: {}", e);
            VaultConfig::default()
        });
        Self::with_store(store, config)
    }
}

impl<S: LibraryStore> PromptVault<S> {
    pub fn with_store(store: S, config: VaultConfig) -> Self {
        Self {
            store,
            state: SessionState::new(),
            config,
        }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Library names for the host's file dropdown.
    pub fn library_names(&self) -> Vec<String> {
        match self.store.list() {
            Ok(names) if !names.is_empty() => names,
            Ok(_) => vec![NO_LIBRARIES.to_string()],
            Err(e) => {
                log::warn!("could not list libraries: {}", e);
                vec![NO_LIBRARIES.to_string()]
            }
        }
    }

    /// Summary lines for the prompt dropdown, cached per parameter
    /// tuple until the backing file changes.
    pub fn prompt_summaries(&mut self, query: &ListQuery) -> Vec<String> {
        commands::list::run(&self.store, &mut self.state, &self.config, query)
    }

    /// Resolve a dropdown selection back to its record. The query must
    /// match the one the summaries were listed with.
    pub fn load(&mut self, query: &ListQuery, selection: &str) -> LoadOutput {
        match commands::resolve::run(&self.store, query, selection) {
            Ok(Some(record)) => LoadOutput {
                prompt: record.text,
                generation_id: record.generation_id,
                timestamp: record.timestamp,
                tags: record.tags.join(", "),
                notes: record.notes.unwrap_or_default(),
            },
            Ok(None) => LoadOutput::default(),
            Err(e) => {
                log::warn!("could not resolve selection: {}", e);
                // degrade to passing the raw selection through as the prompt
                LoadOutput {
                    prompt: selection.to_string(),
                    ..LoadOutput::default()
                }
            }
        }
    }

    /// Run the writer. `request.generation_id` may be empty; the
    /// effective id is reported back either way.
    pub fn save(&mut self, request: &SaveRequest) -> SaveOutput {
        let supplied = request.generation_id.trim();
        let effective_id = if supplied.is_empty() {
            generation_token()
        } else {
            supplied.to_string()
        };
        let refined = SaveRequest {
            generation_id: effective_id.clone(),
            ..request.clone()
        };

        match commands::save::run(&mut self.store, &mut self.state, &self.config, &refined) {
            Ok(outcome) => SaveOutput {
                prompt: request.text.clone(),
                generation_id: outcome.generation_id,
                file_path: outcome
                    .path
                    .map(|path| path.display().to_string())
                    .unwrap_or_default(),
            },
            Err(e) => {
                log::error!("failed to save prompt: {}", e);
                SaveOutput {
                    prompt: request.text.clone(),
                    generation_id: effective_id,
                    file_path: String::new(),
                }
            }
        }
    }

    /// Field-scoped search: `(results text, match count)`.
    pub fn search(&self, query: &SearchQuery) -> (String, String) {
        if query.term.trim().is_empty() {
            return ("No results".to_string(), "0".to_string());
        }

        match commands::search::run(&self.store, &self.config, query) {
            Ok(lines) if lines.is_empty() => ("No matches found".to_string(), "0".to_string()),
            Ok(lines) => {
                let count = lines.len().to_string();
                (lines.join("\n"), count)
            }
            Err(VaultError::LibraryMissing(_)) => ("File not found".to_string(), "0".to_string()),
            Err(e) => {
                log::warn!("search failed: {}", e);
                (format!("Error: {}", e), "0".to_string())
            }
        }
    }

    /// Maintenance operations: `(result, details)`.
    pub fn manage(&mut self, action: ManageAction, library: &str) -> (String, String) {
        let outcome = match action {
            ManageAction::Stats => commands::stats::run(&self.store, library).and_then(|report| {
                Ok(("Stats Generated".to_string(), serde_yaml::to_string(&report)?))
            }),
            ManageAction::Deduplicate => {
                commands::dedupe::run(&mut self.store, library).map(|report| {
                    (
                        "Deduplicated".to_string(),
                        format!("Removed {} duplicate prompts", report.removed),
                    )
                })
            }
            ManageAction::Backup => commands::backup::run(&mut self.store, library).map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                (
                    "Backup Created".to_string(),
                    format!("Backup saved as {}", name),
                )
            }),
        };

        outcome.unwrap_or_else(|e| {
            log::warn!("maintenance failed on {}: {}", library, e);
            ("Error".to_string(), e.to_string())
        })
    }

    /// One-time import of a legacy flat file: `(result, details)`.
    pub fn import_legacy(&mut self, library: &str, source: &Path) -> (String, String) {
        match commands::import::run(&mut self.store, library, source) {
            Ok(report) => (
                "Imported".to_string(),
                format!(
                    "Imported {} prompts ({} already present)",
                    report.imported, report.skipped
                ),
            ),
            Err(e) => {
                log::warn!("import into {} failed: {}", library, e);
                ("Error".to_string(), e.to_string())
            }
        }
    }

    /// Opaque token covering every caller-visible parameter plus the
    /// backing file's modification time. Hosts re-run a node when this
    /// changes; it abstracts their `IS_CHANGED`-style protocols.
    pub fn change_token(&self, query: &ListQuery, refresh: u64) -> String {
        let mtime = self.store.mtime(query.library.trim()).unwrap_or(0);
        let mut hasher = Sha256::new();
        hasher.update(
            format!(
                "{}:{}:{}:{}:{}:{}",
                query.library, query.filter, query.limit, query.search, refresh, mtime
            )
            .as_bytes(),
        );
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterMode, SearchScope};
    use crate::store::memory::MemoryStore;

    fn vault() -> PromptVault<MemoryStore> {
        PromptVault::with_store(MemoryStore::new(), VaultConfig::default())
    }

    fn save_request(text: &str) -> SaveRequest {
        SaveRequest {
            library: "lib".to_string(),
            text: text.to_string(),
            enabled: true,
            force: true,
            generation_id: String::new(),
            tags: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn empty_store_reports_sentinels() {
        let mut v = vault();
        assert_eq!(v.library_names(), vec![NO_LIBRARIES.to_string()]);
        assert_eq!(
            v.prompt_summaries(&ListQuery::new("lib")),
            vec![EMPTY_LIBRARY.to_string()]
        );
        assert_eq!(v.load(&ListQuery::new("lib"), EMPTY_LIBRARY), LoadOutput::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let mut v = vault();
        let mut request = save_request("a cat on a mat");
        request.tags = "cats, cozy".to_string();
        request.notes = "test shot".to_string();

        let saved = v.save(&request);
        assert_eq!(saved.prompt, "a cat on a mat");
        assert_eq!(saved.generation_id.len(), 8);
        assert!(!saved.file_path.is_empty());

        let query = ListQuery::new("lib");
        let lines = v.prompt_summaries(&query);
        assert_eq!(lines.len(), 1);

        let loaded = v.load(&query, &lines[0]);
        assert_eq!(loaded.prompt, "a cat on a mat");
        assert_eq!(loaded.generation_id, saved.generation_id);
        assert_eq!(loaded.tags, "cats, cozy");
        assert_eq!(loaded.notes, "test shot");
        assert!(!loaded.timestamp.is_empty());
    }

    #[test]
    fn mangled_selection_falls_back_to_raw_text() {
        let mut v = vault();
        v.save(&save_request("a cat"));

        let output = v.load(&ListQuery::new("lib"), "[not-a-number] leftovers");
        assert_eq!(output.prompt, "[not-a-number] leftovers");
        assert!(output.generation_id.is_empty());
    }

    #[test]
    fn listing_refreshes_after_new_save() {
        let mut v = vault();
        v.save(&save_request("first"));

        let query = ListQuery::new("lib");
        let before = v.prompt_summaries(&query);
        v.save(&save_request("second"));
        let after = v.prompt_summaries(&query);

        assert_ne!(before, after);
        assert!(after.iter().any(|line| line.contains("second")));
    }

    #[test]
    fn search_outputs_and_sentinels() {
        let mut v = vault();
        v.save(&save_request("a cat on a mat"));

        let mut query = SearchQuery {
            library: "lib".to_string(),
            term: "cat".to_string(),
            scope: SearchScope::All,
            limit: 10,
        };
        let (results, count) = v.search(&query);
        assert_eq!(count, "1");
        assert!(results.contains("a cat"));

        query.term = "zebra".to_string();
        assert_eq!(v.search(&query), ("No matches found".to_string(), "0".to_string()));

        query.term = "  ".to_string();
        assert_eq!(v.search(&query), ("No results".to_string(), "0".to_string()));

        query.library = "missing".to_string();
        query.term = "cat".to_string();
        assert_eq!(v.search(&query), ("File not found".to_string(), "0".to_string()));
    }

    #[test]
    fn manage_reports_errors_as_strings() {
        let mut v = vault();
        let (result, details) = v.manage(ManageAction::Stats, "missing");
        assert_eq!(result, "Error");
        assert!(details.contains("missing"));
    }

    #[test]
    fn manage_stats_and_dedupe_render_details() {
        let mut v = vault();
        v.save(&save_request("a cat"));
        v.save(&save_request("a cat"));

        let (result, details) = v.manage(ManageAction::Stats, "lib");
        assert_eq!(result, "Stats Generated");
        assert!(details.contains("total_prompts: 2"));

        let (result, details) = v.manage(ManageAction::Deduplicate, "lib");
        assert_eq!(result, "Deduplicated");
        assert!(details.contains("Removed 1"));

        let (result, details) = v.manage(ManageAction::Backup, "lib");
        assert_eq!(result, "Backup Created");
        assert!(details.contains("lib_backup_"));
    }

    #[test]
    fn change_token_tracks_parameters_and_file_state() {
        let mut v = vault();
        let query = ListQuery::new("lib");
        let empty = v.change_token(&query, 0);

        v.save(&save_request("a cat"));
        let after_save = v.change_token(&query, 0);
        assert_ne!(empty, after_save);

        assert_ne!(after_save, v.change_token(&query, 1));
        let other = ListQuery::new("lib").with_filter(FilterMode::Oldest);
        assert_ne!(after_save, v.change_token(&other, 0));
        // unchanged inputs give a stable token
        assert_eq!(after_save, v.change_token(&query, 0));
    }

    #[test]
    fn action_parse_accepts_known_names() {
        assert_eq!(ManageAction::parse("stats"), Some(ManageAction::Stats));
        assert_eq!(ManageAction::parse(" Deduplicate "), Some(ManageAction::Deduplicate));
        assert_eq!(ManageAction::parse("merge_files"), None);
    }
}
