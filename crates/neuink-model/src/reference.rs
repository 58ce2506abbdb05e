//! Bibliographic references.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::ids::fresh_id;

/// One bibliography entry.
///
/// `number` is derived as the 1-based position in the paper's references
/// array - document order, deliberately not citation-usage order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reference {
    pub id: SmolStr,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

impl Reference {
    pub fn new(title: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            id: fresh_id("ref"),
            title: title.into(),
            authors,
            ..Default::default()
        }
    }

    /// Whether two entries refer to the same work (dedup key for bulk
    /// import): matching DOI, or matching normalized title.
    pub fn same_work(&self, other: &Reference) -> bool {
        if let (Some(a), Some(b)) = (&self.doi, &other.doi) {
            if !a.is_empty() && a.eq_ignore_ascii_case(b) {
                return true;
            }
        }
        !self.title.is_empty() && normalize_title(&self.title) == normalize_title(&other.title)
    }
}

fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
