//! The paper aggregate root.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::reference::Reference;
use crate::section::Section;
use crate::text::BilingualText;

/// Paper-level metadata edited through the metadata forms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaperMetadata {
    pub title: BilingualText,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

/// An uploaded file attached to the paper (figures, supplementary data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: SmolStr,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// The whole document a paper loads into.
///
/// Mutation always produces a new value: the mutated root-to-node path is
/// rebuilt, everything else keeps `Arc` identity. The struct itself is cheap
/// to clone because the section tree is shared.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaperContent {
    pub metadata: PaperMetadata,
    #[serde(rename = "abstract", default)]
    pub abstract_text: BilingualText,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Arc<Section>>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl PaperContent {
    /// Total number of blocks across the whole tree.
    pub fn block_count(&self) -> usize {
        let mut count = 0;
        crate::section::for_each_block(&self.sections, &mut |_, _| count += 1);
        count
    }
}
