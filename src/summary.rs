//! Rendering of one-line record summaries and parsing them back.
//!
//! Summary lines are what the host shows in its dropdown:
//!
//! ```text
//! [3] 06-01 14:22 ab12cd34 a cat sitting on a windowsill, golden ho... #cats
//! ```
//!
//! The leading `[N]` index is the only part selection resolution
//! relies on; everything after it is presentation.

use crate::config::VaultConfig;
use crate::model::{parse_timestamp, PromptRecord};
use unicode_width::UnicodeWidthChar;

/// Truncate `text` to `width` display columns, ellipsis appended when
/// anything was cut.
pub fn preview(text: &str, width: usize) -> String {
    let flat = text.replace('\n', " | ");

    let mut out = String::new();
    let mut used = 0;
    let mut truncated = false;
    for ch in flat.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            truncated = true;
            break;
        }
        out.push(ch);
        used += w;
    }
    if truncated {
        out.push_str("...");
    }
    out
}

fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

/// Abbreviate a stored timestamp to `MM-DD HH:MM`, degrading to the
/// raw tail for unparseable values.
fn abbreviate_time(raw: &str) -> String {
    if let Some(dt) = parse_timestamp(raw) {
        return dt.format("%m-%d %H:%M").to_string();
    }
    if raw.is_empty() {
        "no-time".to_string()
    } else {
        let start = raw.char_indices().rev().nth(7).map_or(0, |(i, _)| i);
        raw[start..].to_string()
    }
}

fn abbreviate_id(id: &str) -> String {
    if id.is_empty() {
        return "no-id".to_string();
    }
    id.chars().take(8).collect()
}

/// Render the dropdown line for a record at a 1-based position.
pub fn render_line(index: usize, record: &PromptRecord, config: &VaultConfig) -> String {
    let mut body = preview(&record.text, config.preview_width);

    if !record.tags.is_empty() {
        let shown: Vec<&str> = record
            .tags
            .iter()
            .take(config.tag_preview_limit)
            .map(String::as_str)
            .collect();
        let suffix = format!(" #{}", shown.join(" #"));
        if display_width(&body) + display_width(&suffix) <= config.preview_budget {
            body.push_str(&suffix);
        }
    }

    format!(
        "[{}] {} {} {}",
        index,
        abbreviate_time(&record.timestamp),
        abbreviate_id(&record.generation_id),
        body
    )
}

/// Extract the 1-based index from a rendered line. Sentinel values and
/// free-form strings yield `None`.
pub fn parse_index(line: &str) -> Option<usize> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    rest[..end].parse().ok()
}
