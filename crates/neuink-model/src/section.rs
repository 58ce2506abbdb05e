//! Sections: the recursive heading hierarchy that owns content blocks.
//!
//! Children are `Arc`-wrapped. Mutation passes rebuild only the path from
//! root to the mutated node; everything else keeps pointer identity, which
//! is what lets downstream consumers detect "no change" cheaply.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::block::Block;
use crate::ids::fresh_id;
use crate::text::BilingualText;

/// A node in the document's heading hierarchy.
///
/// `number` is the derived dotted path (`"2.3.1"`), overwritten on every
/// numbering pass; it is never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SmolStr,
    pub title: BilingualText,
    #[serde(default)]
    pub content: Vec<Arc<Block>>,
    #[serde(default)]
    pub subsections: Vec<Arc<Section>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<SmolStr>,
}

impl Section {
    pub fn new(title: BilingualText) -> Self {
        Self {
            id: fresh_id("section"),
            title,
            content: Vec::new(),
            subsections: Vec::new(),
            number: None,
        }
    }

    /// Empty section with the default bilingual placeholder title, used when
    /// appending a new subsection.
    pub fn placeholder() -> Self {
        Self::new(BilingualText::new("New Section", "新章节"))
    }

    /// Index of the block with the given id in this section's own content.
    pub fn block_index(&self, block_id: &str) -> Option<usize> {
        self.content.iter().position(|b| b.id == block_id)
    }
}

/// Find the section with the given id anywhere in the tree.
pub fn find_section<'a>(sections: &'a [Arc<Section>], id: &str) -> Option<&'a Arc<Section>> {
    for section in sections {
        if section.id == id {
            return Some(section);
        }
        if let Some(found) = find_section(&section.subsections, id) {
            return Some(found);
        }
    }
    None
}

/// Visit every section depth-first, pre-order.
pub fn for_each_section<'a>(sections: &'a [Arc<Section>], f: &mut impl FnMut(&'a Section)) {
    for section in sections {
        f(section);
        for_each_section(&section.subsections, f);
    }
}

/// Visit every block depth-first, pre-order: a section's own content comes
/// before its subsections' content. Numbering and search both depend on this
/// order.
pub fn for_each_block<'a>(
    sections: &'a [Arc<Section>],
    f: &mut impl FnMut(&'a Section, &'a Arc<Block>),
) {
    for section in sections {
        for block in &section.content {
            f(section, block);
        }
        for_each_block(&section.subsections, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use crate::text::BilingualInlines;

    fn para(text: &str) -> Arc<Block> {
        Arc::new(Block::new(BlockKind::Paragraph {
            content: BilingualInlines::text(text, ""),
        }))
    }

    fn section(title: &str, content: Vec<Arc<Block>>, subs: Vec<Arc<Section>>) -> Arc<Section> {
        let mut s = Section::new(BilingualText::english(title));
        s.content = content;
        s.subsections = subs;
        Arc::new(s)
    }

    #[test]
    fn test_find_nested_section() {
        let inner = section("inner", vec![], vec![]);
        let inner_id = inner.id.clone();
        let tree = vec![section("a", vec![], vec![]), section("b", vec![], vec![inner])];

        assert!(find_section(&tree, &inner_id).is_some());
        assert!(find_section(&tree, "missing").is_none());
    }

    #[test]
    fn test_block_walk_is_preorder() {
        let b1 = para("one");
        let b2 = para("two");
        let b3 = para("three");
        let tree = vec![section(
            "root",
            vec![b1.clone()],
            vec![section("child", vec![b2.clone()], vec![section("grandchild", vec![b3.clone()], vec![])])],
        )];

        let mut seen = Vec::new();
        for_each_block(&tree, &mut |_, block| seen.push(block.id.clone()));
        assert_eq!(seen, vec![b1.id.clone(), b2.id.clone(), b3.id.clone()]);
    }
}
