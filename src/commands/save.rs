use crate::commands::list::EMPTY_LIBRARY;
use crate::commands::{SaveOutcome, SaveRequest};
use crate::config::VaultConfig;
use crate::error::Result;
use crate::hash;
use crate::model::{generation_token, Library, PromptRecord};
use crate::state::{SavedMark, SessionState};
use crate::store::LibraryStore;
use chrono::{Duration, Utc};

/// Decide whether the incoming prompt gets appended, and persist it.
///
/// The decision chain:
/// 1. Disabled toggle, empty text, or the listing sentinel: no-op.
/// 2. Without `force`, an unchanged content hash (vs the last persisted
///    save to this library in this session) short-circuits, echoing the
///    previous outcome.
/// 3. A duplicate already in the file (same hash, and either the same
///    generation id or a timestamp within the recency window) skips the
///    append unless `force` is set; the duplicate's id is reported back.
pub fn run<S: LibraryStore>(
    store: &mut S,
    state: &mut SessionState,
    config: &VaultConfig,
    request: &SaveRequest,
) -> Result<SaveOutcome> {
    let library_name = request.library.trim().to_string();
    let supplied_id = request.generation_id.trim();
    let generation_id = if supplied_id.is_empty() {
        generation_token()
    } else {
        supplied_id.to_string()
    };

    let skipped = SaveOutcome {
        saved: false,
        generation_id: generation_id.clone(),
        path: None,
        duplicate: false,
    };

    if !request.enabled
        || library_name.is_empty()
        || request.text.trim().is_empty()
        || request.text == EMPTY_LIBRARY
    {
        return Ok(skipped);
    }

    let content = hash::full_hash(&request.text);

    if !request.force {
        if let Some(mark) = state.last_mark(&library_name) {
            if mark.content_hash == content {
                log::info!("skipping save to {}: no changes detected", library_name);
                return Ok(SaveOutcome {
                    saved: false,
                    generation_id: mark.generation_id.clone(),
                    path: Some(mark.path.clone()),
                    duplicate: false,
                });
            }
        }
    }

    let mut library = match store.load(&library_name) {
        Ok(Some(existing)) => existing,
        Ok(None) => Library::new(),
        Err(e) => {
            log::warn!(
                "could not read existing library {}: {} (starting fresh)",
                library_name,
                e
            );
            Library::new()
        }
    };

    let duplicate_id = find_duplicate(
        &library.prompts,
        &content,
        &generation_id,
        config.duplicate_window_mins,
    )
    .map(|existing| {
        if existing.generation_id.is_empty() {
            generation_id.clone()
        } else {
            existing.generation_id.clone()
        }
    });

    if let Some(dup_id) = &duplicate_id {
        if !request.force {
            log::info!("duplicate prompt found in {}, skipping save", library_name);
            return Ok(SaveOutcome {
                saved: false,
                generation_id: dup_id.clone(),
                path: Some(store.path(&library_name)),
                duplicate: true,
            });
        }
    }

    let mut record = PromptRecord::new(request.text.clone(), generation_id.clone());
    record.tags = split_tags(&request.tags);
    let notes = request.notes.trim();
    if !notes.is_empty() {
        record.notes = Some(notes.to_string());
    }

    library.push(record);
    let path = store.save(&library_name, &library)?;
    state.note_saved(
        &library_name,
        SavedMark {
            content_hash: content,
            generation_id: generation_id.clone(),
            path: path.clone(),
        },
    );

    if duplicate_id.is_some() {
        log::info!(
            "saved to {} despite duplicate (forced), {} prompts total",
            library_name,
            library.metadata.total_prompts
        );
    } else {
        log::info!(
            "saved new prompt to {} with id {}, {} prompts total",
            library_name,
            generation_id,
            library.metadata.total_prompts
        );
    }

    Ok(SaveOutcome {
        saved: true,
        generation_id,
        path: Some(path),
        duplicate: duplicate_id.is_some(),
    })
}

/// First record whose trimmed text hashes to `content` and that either
/// carries the same generation id or was written within the recency
/// window. Records with unparseable timestamps never match on recency.
fn find_duplicate<'a>(
    prompts: &'a [PromptRecord],
    content: &str,
    generation_id: &str,
    window_mins: i64,
) -> Option<&'a PromptRecord> {
    let now = Utc::now();
    prompts.iter().find(|existing| {
        if hash::full_hash(&existing.text) != content {
            return false;
        }
        if !generation_id.is_empty() && existing.generation_id == generation_id {
            return true;
        }
        existing.parsed_timestamp().is_some_and(|ts| {
            now.signed_duration_since(ts).num_seconds().abs() < Duration::minutes(window_mins).num_seconds()
        })
    })
}

/// Split a comma-separated tag string, trimming and dropping empties.
fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn request(text: &str) -> SaveRequest {
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

    fn setup() -> (MemoryStore, SessionState, VaultConfig) {
        (MemoryStore::new(), SessionState::new(), VaultConfig::default())
    }

    #[test]
    fn disabled_toggle_is_a_no_op() {
        let (mut store, mut state, config) = setup();
        let mut req = request("a cat");
        req.enabled = false;

        let outcome = run(&mut store, &mut state, &config, &req).unwrap();
        assert!(!outcome.saved);
        assert!(outcome.path.is_none());
        assert!(store.load("lib").unwrap().is_none());
    }

    #[test]
    fn empty_and_sentinel_text_are_no_ops() {
        let (mut store, mut state, config) = setup();
        for text in ["", "   ", EMPTY_LIBRARY] {
            let outcome = run(&mut store, &mut state, &config, &request(text)).unwrap();
            assert!(!outcome.saved);
        }
        assert!(store.load("lib").unwrap().is_none());
    }

    #[test]
    fn save_appends_exactly_one_record_and_recounts() {
        let (mut store, mut state, config) = setup();
        let outcome = run(&mut store, &mut state, &config, &request("a cat")).unwrap();

        assert!(outcome.saved);
        assert_eq!(outcome.generation_id.len(), 8);

        let library = store.load("lib").unwrap().unwrap();
        assert_eq!(library.prompts.len(), 1);
        assert_eq!(library.metadata.total_prompts, 1);
        assert!(!library.prompts[0].timestamp.is_empty());
    }

    #[test]
    fn unchanged_content_short_circuits_without_appending() {
        let (mut store, mut state, config) = setup();
        let first = run(&mut store, &mut state, &config, &request("a cat")).unwrap();

        let mut again = request("a cat");
        again.force = false;
        let second = run(&mut store, &mut state, &config, &again).unwrap();

        assert!(!second.saved);
        assert_eq!(second.generation_id, first.generation_id);
        assert_eq!(second.path, first.path);
        assert_eq!(store.load("lib").unwrap().unwrap().prompts.len(), 1);
    }

    #[test]
    fn recent_duplicate_in_file_skips_save_and_reports_its_id() {
        let (mut store, mut state, config) = setup();
        let first = run(&mut store, &mut state, &config, &request("a cat")).unwrap();

        // fresh session: change detection has no memory, the file scan
        // still catches the duplicate
        let mut fresh = SessionState::new();
        let mut req = request("a cat");
        req.force = false;
        let outcome = run(&mut store, &mut fresh, &config, &req).unwrap();

        assert!(!outcome.saved);
        assert!(outcome.duplicate);
        assert_eq!(outcome.generation_id, first.generation_id);
        assert_eq!(store.load("lib").unwrap().unwrap().prompts.len(), 1);
    }

    #[test]
    fn force_appends_even_when_duplicate_exists() {
        let (mut store, mut state, config) = setup();
        run(&mut store, &mut state, &config, &request("a cat")).unwrap();
        let outcome = run(&mut store, &mut state, &config, &request("a cat")).unwrap();

        assert!(outcome.saved);
        assert!(outcome.duplicate);
        let library = store.load("lib").unwrap().unwrap();
        assert_eq!(library.prompts.len(), 2);
        assert_eq!(library.metadata.total_prompts, 2);
    }

    #[test]
    fn matching_generation_id_marks_duplicate_regardless_of_age() {
        let (mut store, mut state, config) = setup();
        let mut old = Library::new();
        let mut record = PromptRecord::new("a cat".into(), "fixed123".into());
        record.timestamp = "2001-01-01T00:00:00+00:00".to_string();
        old.push(record);
        store.save("lib", &old).unwrap();

        let mut req = request("a cat");
        req.force = false;
        req.generation_id = "fixed123".to_string();
        let outcome = run(&mut store, &mut state, &config, &req).unwrap();

        assert!(!outcome.saved);
        assert!(outcome.duplicate);
        assert_eq!(outcome.generation_id, "fixed123");
    }

    #[test]
    fn stale_duplicate_outside_window_is_appended() {
        let (mut store, mut state, config) = setup();
        let mut old = Library::new();
        let mut record = PromptRecord::new("a cat".into(), "old12345".into());
        record.timestamp = "2001-01-01T00:00:00+00:00".to_string();
        old.push(record);
        store.save("lib", &old).unwrap();

        let mut req = request("a cat");
        req.force = false;
        let outcome = run(&mut store, &mut state, &config, &req).unwrap();

        assert!(outcome.saved);
        assert!(!outcome.duplicate);
        assert_eq!(store.load("lib").unwrap().unwrap().prompts.len(), 2);
    }

    #[test]
    fn supplied_generation_id_is_used_verbatim() {
        let (mut store, mut state, config) = setup();
        let mut req = request("a cat");
        req.generation_id = "  my-id  ".to_string();

        let outcome = run(&mut store, &mut state, &config, &req).unwrap();
        assert_eq!(outcome.generation_id, "my-id");
        let library = store.load("lib").unwrap().unwrap();
        assert_eq!(library.prompts[0].generation_id, "my-id");
    }

    #[test]
    fn tags_are_split_trimmed_and_notes_trimmed() {
        let (mut store, mut state, config) = setup();
        let mut req = request("a cat");
        req.tags = " cats, , cozy ,".to_string();
        req.notes = "  looked great  ".to_string();

        run(&mut store, &mut state, &config, &req).unwrap();
        let record = &store.load("lib").unwrap().unwrap().prompts[0];
        assert_eq!(record.tags, vec!["cats".to_string(), "cozy".to_string()]);
        assert_eq!(record.notes.as_deref(), Some("looked great"));
    }
}
