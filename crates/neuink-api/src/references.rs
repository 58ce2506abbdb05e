//! Bulk reference parsing and merging.
//!
//! Partial success is the normal case, not an exception: every input entry
//! is committed. Entries that fail to parse are committed as
//! error-placeholder references (title replaced with an error marker) AND
//! reported in `errors`, so the user can fix them in place instead of losing
//! the input.

use neuink_model::Reference;
use serde::{Deserialize, Serialize};

use crate::error::NeuInkError;

/// One per-entry parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceParseError {
    /// 0-based index of the entry in the raw input.
    pub index: usize,
    /// The raw line that failed.
    pub raw: String,
    pub message: String,
}

/// Result of parsing raw reference text.
///
/// `references` contains one entry per input line - clean parses and error
/// placeholders alike. `count` is the number of cleanly parsed entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedReferences {
    pub references: Vec<Reference>,
    pub count: usize,
    pub errors: Vec<ReferenceParseError>,
}

/// What a bulk import did to the document's reference list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceParseReport {
    /// Entries appended to the list.
    pub added: Vec<Reference>,
    /// Existing entries that were refreshed by a duplicate.
    pub updated: Vec<Reference>,
    pub duplicate_count: usize,
    pub result: ParsedReferences,
}

/// The remote bulk reference parser.
#[trait_variant::make(Send)]
pub trait ReferenceParser {
    async fn parse_references(
        &self,
        target_id: &str,
        raw: &str,
    ) -> Result<ReferenceParseReport, NeuInkError>;
}

/// Marker prefixed to the title of an entry that failed to parse.
pub const PARSE_ERROR_MARKER: &str = "[parse error]";

/// Parse raw reference text, one entry per non-empty line.
///
/// A leading `[n]` marker is stripped. An entry parses cleanly when it has at
/// least three comma-separated fields and the last one is a plausible year:
/// `authors..., title, year`. Anything else becomes an error placeholder.
pub fn parse_reference_lines(raw: &str) -> ParsedReferences {
    let mut parsed = ParsedReferences::default();

    for (index, line) in raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
    {
        let entry = strip_entry_marker(line);
        match parse_entry(entry) {
            Ok(reference) => {
                parsed.count += 1;
                parsed.references.push(reference);
            }
            Err(message) => {
                tracing::debug!(index, line, "reference entry failed to parse");
                let placeholder =
                    Reference::new(format!("{PARSE_ERROR_MARKER} {entry}"), Vec::new());
                parsed.references.push(placeholder);
                parsed.errors.push(ReferenceParseError {
                    index,
                    raw: line.to_string(),
                    message,
                });
            }
        }
    }

    parsed
}

/// Merge parsed entries into an existing reference list.
///
/// Entries matching an existing work (by DOI or normalized title) refresh
/// that entry in place and count as duplicates; everything else - error
/// placeholders included - is appended.
pub fn merge_references(
    existing: &mut Vec<Reference>,
    parsed: ParsedReferences,
) -> ReferenceParseReport {
    let mut added = Vec::new();
    let mut updated = Vec::new();
    let mut duplicate_count = 0;

    for reference in &parsed.references {
        if let Some(slot) = existing.iter_mut().find(|r| r.same_work(reference)) {
            let mut refreshed = reference.clone();
            refreshed.id = slot.id.clone();
            *slot = refreshed.clone();
            duplicate_count += 1;
            updated.push(refreshed);
        } else {
            existing.push(reference.clone());
            added.push(reference.clone());
        }
    }

    ReferenceParseReport {
        added,
        updated,
        duplicate_count,
        result: parsed,
    }
}

fn strip_entry_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix('[') {
        if let Some((marker, tail)) = rest.split_once(']') {
            if !marker.is_empty() && marker.chars().all(|c| c.is_ascii_digit()) {
                return tail.trim_start();
            }
        }
    }
    line
}

fn parse_entry(entry: &str) -> Result<Reference, String> {
    let fields: Vec<&str> = entry
        .split(',')
        .map(|f| f.trim().trim_end_matches('.').trim())
        .filter(|f| !f.is_empty())
        .collect();

    if fields.len() < 3 {
        return Err(format!(
            "expected at least authors, title and year, got {} field(s)",
            fields.len()
        ));
    }

    let year_field = fields[fields.len() - 1];
    let year: i32 = year_field
        .parse()
        .map_err(|_| format!("trailing field {year_field:?} is not a year"))?;
    if !(1000..3000).contains(&year) {
        return Err(format!("year {year} out of range"));
    }

    let title = fields[fields.len() - 2].to_string();
    let authors = fields[..fields.len() - 2]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut reference = Reference::new(title, authors);
    reference.year = Some(year);
    Ok(reference)
}
