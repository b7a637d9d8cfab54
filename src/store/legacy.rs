//! Readers for the flat formats that predate the YAML libraries.
//!
//! Two generations exist in the wild: a tabular CSV file with columns
//! `timestamp, generation_id, prompt_text` (newlines escaped as `\n`
//! inside the text column), and an even older plain text file with one
//! escaped prompt per line and no metadata at all. Both are import
//! sources only; nothing writes them anymore.

use crate::error::Result;
use crate::hash;
use crate::model::{parse_timestamp, PromptRecord};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    generation_id: String,
    #[serde(default)]
    prompt_text: String,
}

/// Restore the `\n` escapes the flat writers applied to keep prompts
/// on one physical line.
fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Normalize a legacy timestamp to RFC 3339 where possible, keeping
/// the raw value otherwise so nothing is silently dropped.
fn normalize_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => crate::model::format_stamp(dt),
        None => raw.to_string(),
    }
}

/// Read a legacy tabular CSV library.
pub fn read_csv_records(path: &Path) -> Result<Vec<PromptRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for row in reader.deserialize() {
        let row: CsvRow = row?;
        let text = unescape(&row.prompt_text);
        if text.trim().is_empty() {
            continue;
        }
        records.push(PromptRecord {
            content_hash: hash::short_hash(&text),
            text,
            timestamp: normalize_timestamp(&row.timestamp),
            generation_id: row.generation_id,
            tags: Vec::new(),
            notes: None,
        });
    }
    Ok(records)
}

/// Read the plain delimited text format: one escaped prompt per line.
pub fn read_text_records(path: &Path) -> Result<Vec<PromptRecord>> {
    let content = fs::read_to_string(path)?;
    let records = content
        .lines()
        .map(unescape)
        .filter(|text| !text.trim().is_empty())
        .map(|text| PromptRecord {
            content_hash: hash::short_hash(&text),
            text,
            timestamp: String::new(),
            generation_id: String::new(),
            tags: Vec::new(),
            notes: None,
        })
        .collect();
    Ok(records)
}
