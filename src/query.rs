//! The shared filter → sort → limit pipeline.
//!
//! Listing renders from this selection, and selection resolution
//! re-runs it with the same parameters to map a 1-based index back to
//! a record. Both paths MUST go through [`select`]: any divergence
//! makes resolved indexes point at the wrong record.

use crate::model::PromptRecord;

/// Sort order applied to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    #[default]
    Recent,
    Oldest,
    Alphabetical,
    /// File order preserved.
    All,
}

impl FilterMode {
    /// Parse a host-supplied mode string. Unknown values preserve file
    /// order, matching how older library formats behaved.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "recent" => FilterMode::Recent,
            "oldest" => FilterMode::Oldest,
            "alphabetical" => FilterMode::Alphabetical,
            _ => FilterMode::All,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FilterMode::Recent => "recent",
            FilterMode::Oldest => "oldest",
            FilterMode::Alphabetical => "alphabetical",
            FilterMode::All => "all",
        };
        write!(f, "{}", name)
    }
}

/// Which record fields a scoped search inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    Text,
    Tags,
    Notes,
    #[default]
    All,
}

impl SearchScope {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "text" => SearchScope::Text,
            "tags" => SearchScope::Tags,
            "notes" => SearchScope::Notes,
            _ => SearchScope::All,
        }
    }
}

/// Case-insensitive substring match across text, tags, notes and
/// generation id. An empty term matches everything.
pub fn matches_term(record: &PromptRecord, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    record.text.to_lowercase().contains(&term)
        || record
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&term))
        || record
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(&term))
        || record.generation_id.to_lowercase().contains(&term)
}

/// Scoped variant used by the search operation.
pub fn matches_in_scope(record: &PromptRecord, term: &str, scope: SearchScope) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }

    let in_text = || record.text.to_lowercase().contains(&term);
    let in_tags = || record.tags.iter().any(|tag| tag.to_lowercase().contains(&term));
    let in_notes = || {
        record
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(&term))
    };

    match scope {
        SearchScope::Text => in_text(),
        SearchScope::Tags => in_tags(),
        SearchScope::Notes => in_notes(),
        SearchScope::All => in_text() || in_tags() || in_notes(),
    }
}

/// Apply search, sort and limit, in that order. Sorting is stable, so
/// records with equal keys keep their file order.
pub fn select<'a>(
    records: &'a [PromptRecord],
    filter: FilterMode,
    limit: usize,
    search: &str,
) -> Vec<&'a PromptRecord> {
    let mut selected: Vec<&PromptRecord> = records
        .iter()
        .filter(|record| matches_term(record, search))
        .collect();

    match filter {
        FilterMode::Recent => selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        FilterMode::Oldest => selected.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        FilterMode::Alphabetical => {
            selected.sort_by_key(|record| record.text.to_lowercase());
        }
        FilterMode::All => {}
    }

    selected.truncate(limit);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PromptRecord;

    fn record(text: &str, timestamp: &str) -> PromptRecord {
        PromptRecord {
            text: text.to_string(),
            timestamp: timestamp.to_string(),
            generation_id: "gen00000".to_string(),
            content_hash: crate::hash::short_hash(text),
            tags: Vec::new(),
            notes: None,
        }
    }

    #[test]
    fn recent_sorts_newest_first() {
        let records = vec![
            record("old", "2024-01-01T00:00:00+00:00"),
            record("new", "2024-06-01T00:00:00+00:00"),
        ];
        let selected = select(&records, FilterMode::Recent, 10, "");
        assert_eq!(selected[0].text, "new");
    }

    #[test]
    fn alphabetical_ignores_case_and_limit_applies_after_sort() {
        let records = vec![
            record("Banana", "2024-01-01T00:00:00+00:00"),
            record("apple", "2024-06-01T00:00:00+00:00"),
        ];
        let selected = select(&records, FilterMode::Alphabetical, 1, "");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].text, "apple");
    }

    #[test]
    fn all_preserves_file_order() {
        let records = vec![
            record("b", "2024-06-01T00:00:00+00:00"),
            record("a", "2024-01-01T00:00:00+00:00"),
        ];
        let selected = select(&records, FilterMode::All, 10, "");
        assert_eq!(selected[0].text, "b");
    }

    #[test]
    fn search_applies_before_limit() {
        let records = vec![
            record("a cat on a mat", "2024-01-01T00:00:00+00:00"),
            record("unrelated", "2024-02-01T00:00:00+00:00"),
            record("another cat", "2024-03-01T00:00:00+00:00"),
        ];
        let selected = select(&records, FilterMode::Oldest, 2, "CAT");
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.text.contains("cat")));
    }

    #[test]
    fn term_matches_tags_notes_and_generation_id() {
        let mut rec = record("plain", "2024-01-01T00:00:00+00:00");
        rec.tags = vec!["Portrait".to_string()];
        rec.notes = Some("needs more light".to_string());

        assert!(matches_term(&rec, "portrait"));
        assert!(matches_term(&rec, "LIGHT"));
        assert!(matches_term(&rec, "gen0"));
        assert!(!matches_term(&rec, "missing"));
    }

    #[test]
    fn scoped_search_restricts_fields() {
        let mut rec = record("plain text", "2024-01-01T00:00:00+00:00");
        rec.tags = vec!["portrait".to_string()];

        assert!(matches_in_scope(&rec, "portrait", SearchScope::Tags));
        assert!(!matches_in_scope(&rec, "portrait", SearchScope::Text));
        assert!(matches_in_scope(&rec, "portrait", SearchScope::All));
        assert!(!matches_in_scope(&rec, "", SearchScope::All));
    }

    #[test]
    fn parse_accepts_known_modes_and_defaults_to_file_order() {
        assert_eq!(FilterMode::parse("Recent"), FilterMode::Recent);
        assert_eq!(FilterMode::parse("oldest"), FilterMode::Oldest);
        assert_eq!(FilterMode::parse("whatever"), FilterMode::All);
        assert_eq!(SearchScope::parse("Tags"), SearchScope::Tags);
        assert_eq!(SearchScope::parse("everything"), SearchScope::All);
    }
}
