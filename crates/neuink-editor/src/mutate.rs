//! Copy-on-write structural edits over the section tree.
//!
//! Every operation takes the current `sections` slice and returns a
//! `TreeUpdate`: the (possibly new) tree plus a `touched` flag. A mutation
//! targeting an unknown id is a defensive no-op - the original handles come
//! back unchanged and `touched` is false - never an error. Callers must
//! check the flag before re-rendering or marking the document dirty.
//!
//! Only the path from root to the mutated node is rebuilt; sibling and
//! unrelated subtrees keep `Arc` identity.

use std::sync::Arc;

use neuink_model::{Block, LanguageMode, Section};

/// Result of a structural edit.
#[derive(Debug, Clone)]
pub struct TreeUpdate {
    pub sections: Vec<Arc<Section>>,
    pub touched: bool,
}

impl TreeUpdate {
    fn unchanged(sections: &[Arc<Section>]) -> Self {
        Self {
            sections: sections.to_vec(),
            touched: false,
        }
    }

    fn changed(sections: Vec<Arc<Section>>) -> Self {
        Self {
            sections,
            touched: true,
        }
    }
}

/// Where `insert_block` places the new placeholder relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Above,
    Below,
}

/// Direction for `move_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// What a block transform did to its target.
#[derive(Debug, Clone)]
pub enum BlockEdit {
    /// Replace the block.
    Replace(Block),
    /// Delete it.
    Remove,
    /// Insert a sibling immediately after it (duplicate path).
    InsertAfter(Block),
}

/// Apply `transform` to the one section with the given id.
pub fn update_section<F>(sections: &[Arc<Section>], section_id: &str, transform: F) -> TreeUpdate
where
    F: FnOnce(&Section) -> Section,
{
    let mut transform = Some(transform);
    match rebuild_at_section(sections, section_id, &mut transform) {
        Some(new) => TreeUpdate::changed(new),
        None => {
            tracing::debug!(section_id, "update_section: no matching section");
            TreeUpdate::unchanged(sections)
        }
    }
}

/// Remove the section (and its whole subtree) from wherever it is nested.
pub fn delete_section(sections: &[Arc<Section>], section_id: &str) -> TreeUpdate {
    match remove_section(sections, section_id) {
        Some(new) => TreeUpdate::changed(new),
        None => {
            tracing::debug!(section_id, "delete_section: no matching section");
            TreeUpdate::unchanged(sections)
        }
    }
}

/// Append a new empty placeholder section to `parent.subsections`.
pub fn add_subsection(sections: &[Arc<Section>], parent_id: &str) -> TreeUpdate {
    update_section(sections, parent_id, |parent| {
        let mut parent = parent.clone();
        parent.subsections.push(Arc::new(Section::placeholder()));
        parent
    })
}

/// Apply `transform` to the block with the given id, rebuilding only the
/// owning section's content array (and its ancestors).
pub fn update_block<F>(sections: &[Arc<Section>], block_id: &str, transform: F) -> TreeUpdate
where
    F: FnOnce(&Section, &Block) -> BlockEdit,
{
    let mut transform = Some(transform);
    rewrite_owning_section(sections, block_id, &mut |section, index| {
        let Some(transform) = transform.take() else {
            return None;
        };
        let edit = transform(section, &section.content[index]);
        let mut section = section.clone();
        match edit {
            BlockEdit::Replace(block) => section.content[index] = Arc::new(block),
            BlockEdit::Remove => {
                section.content.remove(index);
            }
            BlockEdit::InsertAfter(block) => {
                section.content.insert(index + 1, Arc::new(block));
            }
        }
        Some(section)
    })
}

/// Splice a new placeholder paragraph adjacent to the anchor block.
///
/// The placeholder's seeded language variants follow the current display
/// language setting.
pub fn insert_block(
    sections: &[Arc<Section>],
    block_id: &str,
    position: InsertPosition,
    mode: LanguageMode,
) -> TreeUpdate {
    rewrite_owning_section(sections, block_id, &mut |section, index| {
        let at = match position {
            InsertPosition::Above => index,
            InsertPosition::Below => index + 1,
        };
        let mut section = section.clone();
        section
            .content
            .insert(at, Arc::new(Block::placeholder_paragraph(mode)));
        Some(section)
    })
}

/// Swap the block with its immediate neighbor. No-op at the boundary.
pub fn move_block(sections: &[Arc<Section>], block_id: &str, direction: MoveDirection) -> TreeUpdate {
    rewrite_owning_section(sections, block_id, &mut |section, index| {
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1)?,
            MoveDirection::Down => {
                if index + 1 >= section.content.len() {
                    return None;
                }
                index + 1
            }
        };
        let mut section = section.clone();
        section.content.swap(index, target);
        Some(section)
    })
}

/// Deep-clone the block with a fresh id and insert it immediately after the
/// original.
pub fn duplicate_block(sections: &[Arc<Section>], block_id: &str) -> TreeUpdate {
    rewrite_owning_section(sections, block_id, &mut |section, index| {
        let copy = section.content[index].duplicate();
        let mut section = section.clone();
        section.content.insert(index + 1, Arc::new(copy));
        Some(section)
    })
}

/// Append a new empty section to the subsections of the section containing
/// the block (promotes a block's context into a nested section).
pub fn append_subsection_from_block(sections: &[Arc<Section>], block_id: &str) -> TreeUpdate {
    rewrite_owning_section(sections, block_id, &mut |section, _| {
        let mut section = section.clone();
        section.subsections.push(Arc::new(Section::placeholder()));
        Some(section)
    })
}

/// Insert a run of blocks (e.g. from a parse service) immediately after the
/// anchor block, in order.
pub fn insert_blocks_after(
    sections: &[Arc<Section>],
    anchor_id: &str,
    blocks: Vec<Block>,
) -> TreeUpdate {
    let mut blocks = Some(blocks);
    rewrite_owning_section(sections, anchor_id, &mut |section, index| {
        let blocks = blocks.take()?;
        if blocks.is_empty() {
            return None;
        }
        let mut section = section.clone();
        for (offset, block) in blocks.into_iter().enumerate() {
            section.content.insert(index + 1 + offset, Arc::new(block));
        }
        Some(section)
    })
}

/// Walk the tree for the section that directly contains `block_id`, let
/// `rewrite` produce its replacement, and rebuild the ancestor path.
/// `rewrite` returning `None` means "found, but nothing to change".
fn rewrite_owning_section(
    sections: &[Arc<Section>],
    block_id: &str,
    rewrite: &mut dyn FnMut(&Section, usize) -> Option<Section>,
) -> TreeUpdate {
    match rewrite_walk(sections, block_id, rewrite) {
        Some(new) => TreeUpdate::changed(new),
        None => {
            tracing::debug!(block_id, "block mutation was a no-op");
            TreeUpdate::unchanged(sections)
        }
    }
}

fn rewrite_walk(
    sections: &[Arc<Section>],
    block_id: &str,
    rewrite: &mut dyn FnMut(&Section, usize) -> Option<Section>,
) -> Option<Vec<Arc<Section>>> {
    for (i, section) in sections.iter().enumerate() {
        if let Some(index) = section.block_index(block_id) {
            let replacement = rewrite(section, index)?;
            let mut out = sections.to_vec();
            out[i] = Arc::new(replacement);
            return Some(out);
        }
        if let Some(subsections) = rewrite_walk(&section.subsections, block_id, rewrite) {
            let mut owner = (**section).clone();
            owner.subsections = subsections;
            let mut out = sections.to_vec();
            out[i] = Arc::new(owner);
            return Some(out);
        }
    }
    None
}

fn rebuild_at_section<F>(
    sections: &[Arc<Section>],
    section_id: &str,
    transform: &mut Option<F>,
) -> Option<Vec<Arc<Section>>>
where
    F: FnOnce(&Section) -> Section,
{
    for (i, section) in sections.iter().enumerate() {
        if section.id == section_id {
            let transform = transform.take()?;
            let mut out = sections.to_vec();
            out[i] = Arc::new(transform(section));
            return Some(out);
        }
        if let Some(subsections) = rebuild_at_section(&section.subsections, section_id, transform) {
            let mut owner = (**section).clone();
            owner.subsections = subsections;
            let mut out = sections.to_vec();
            out[i] = Arc::new(owner);
            return Some(out);
        }
    }
    None
}

fn remove_section(sections: &[Arc<Section>], section_id: &str) -> Option<Vec<Arc<Section>>> {
    if let Some(i) = sections.iter().position(|s| s.id == section_id) {
        let mut out = sections.to_vec();
        out.remove(i);
        return Some(out);
    }
    for (i, section) in sections.iter().enumerate() {
        if let Some(subsections) = remove_section(&section.subsections, section_id) {
            let mut owner = (**section).clone();
            owner.subsections = subsections;
            let mut out = sections.to_vec();
            out[i] = Arc::new(owner);
            return Some(out);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuink_model::{BilingualInlines, BilingualText, BlockKind};

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

    fn same_handles(a: &[Arc<Section>], b: &[Arc<Section>]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
    }

    #[test]
    fn test_unknown_id_is_identity_noop() {
        let tree = vec![section("s1", vec![para("a")], vec![])];
        let update = move_block(&tree, "missing-id", MoveDirection::Up);
        assert!(!update.touched);
        assert!(same_handles(&tree, &update.sections));
    }

    #[test]
    fn test_copy_on_write_locality() {
        let s1 = section("s1", vec![], vec![]);
        let s2 = section("s2", vec![], vec![]);
        let s3 = section("s3", vec![], vec![]);
        let s2_id = s2.id.clone();
        let tree = vec![s1.clone(), s2, s3.clone()];

        let update = update_section(&tree, &s2_id, |sec| {
            let mut sec = sec.clone();
            sec.title = BilingualText::english("renamed");
            sec
        });

        assert!(update.touched);
        assert!(Arc::ptr_eq(&update.sections[0], &s1));
        assert!(Arc::ptr_eq(&update.sections[2], &s3));
        assert!(!Arc::ptr_eq(&update.sections[1], &tree[1]));
        assert_eq!(update.sections[1].title.en, "renamed");
    }

    #[test]
    fn test_nested_update_keeps_sibling_subtrees() {
        let deep = section("deep", vec![], vec![]);
        let deep_id = deep.id.clone();
        let sibling = section("sibling", vec![], vec![]);
        let parent = section("parent", vec![], vec![deep, sibling.clone()]);
        let other = section("other", vec![], vec![]);
        let tree = vec![parent, other.clone()];

        let update = add_subsection(&tree, &deep_id);
        assert!(update.touched);
        // Untouched top-level sibling keeps identity.
        assert!(Arc::ptr_eq(&update.sections[1], &other));
        // Ancestor path is new.
        assert!(!Arc::ptr_eq(&update.sections[0], &tree[0]));
        // Untouched subtree under the rebuilt parent keeps identity.
        assert!(Arc::ptr_eq(&update.sections[0].subsections[1], &sibling));
        assert_eq!(update.sections[0].subsections[0].subsections.len(), 1);
    }

    #[test]
    fn test_delete_nested_section() {
        let victim = section("victim", vec![para("doomed")], vec![]);
        let victim_id = victim.id.clone();
        let parent = section("parent", vec![], vec![victim]);
        let tree = vec![parent];

        let update = delete_section(&tree, &victim_id);
        assert!(update.touched);
        assert!(update.sections[0].subsections.is_empty());

        let update = delete_section(&update.sections, "already-gone");
        assert!(!update.touched);
    }

    #[test]
    fn test_move_block_boundaries() {
        let first = para("first");
        let last = para("last");
        let first_id = first.id.clone();
        let last_id = last.id.clone();
        let tree = vec![section("s", vec![first, para("mid"), last], vec![])];

        let up = move_block(&tree, &first_id, MoveDirection::Up);
        assert!(!up.touched);
        assert!(same_handles(&tree, &up.sections));

        let down = move_block(&tree, &last_id, MoveDirection::Down);
        assert!(!down.touched);

        let moved = move_block(&tree, &last_id, MoveDirection::Up);
        assert!(moved.touched);
        assert_eq!(moved.sections[0].content[1].id, last_id);
    }

    #[test]
    fn test_duplicate_block_unique_id_same_payload() {
        let original = para("copy me");
        let original_id = original.id.clone();
        let tree = vec![section("s", vec![original], vec![])];

        let update = duplicate_block(&tree, &original_id);
        assert!(update.touched);
        let content = &update.sections[0].content;
        assert_eq!(content.len(), 2);
        assert_ne!(content[1].id, content[0].id);
        assert_eq!(content[1].kind, content[0].kind);

        let mut ids = std::collections::HashSet::new();
        for block in content {
            assert!(ids.insert(block.id.clone()));
        }
    }

    #[test]
    fn test_insert_block_above_and_below() {
        let anchor = para("anchor");
        let anchor_id = anchor.id.clone();
        let tree = vec![section("s", vec![anchor], vec![])];

        let above = insert_block(&tree, &anchor_id, InsertPosition::Above, LanguageMode::Both);
        assert!(above.touched);
        assert_eq!(above.sections[0].content[1].id, anchor_id);

        let below = insert_block(&tree, &anchor_id, InsertPosition::Below, LanguageMode::Both);
        assert_eq!(below.sections[0].content[0].id, anchor_id);
        assert_eq!(below.sections[0].content.len(), 2);
    }

    #[test]
    fn test_update_block_remove_and_insert_after() {
        let a = para("a");
        let b = para("b");
        let a_id = a.id.clone();
        let b_id = b.id.clone();
        let tree = vec![section("s", vec![a, b], vec![])];

        let removed = update_block(&tree, &a_id, |_, _| BlockEdit::Remove);
        assert!(removed.touched);
        assert_eq!(removed.sections[0].content.len(), 1);
        assert_eq!(removed.sections[0].content[0].id, b_id);

        let inserted = update_block(&tree, &b_id, |_, block| {
            BlockEdit::InsertAfter(block.duplicate())
        });
        assert_eq!(inserted.sections[0].content.len(), 3);
    }

    #[test]
    fn test_append_subsection_from_block() {
        let inner = para("inner");
        let inner_id = inner.id.clone();
        let child = section("child", vec![inner], vec![]);
        let tree = vec![section("root", vec![], vec![child])];

        let update = append_subsection_from_block(&tree, &inner_id);
        assert!(update.touched);
        assert_eq!(update.sections[0].subsections[0].subsections.len(), 1);
    }

    #[test]
    fn test_insert_blocks_after_preserves_order() {
        let anchor = para("anchor");
        let anchor_id = anchor.id.clone();
        let tree = vec![section("s", vec![anchor, para("tail")], vec![])];

        let parsed = vec![
            (*para("one")).clone(),
            (*para("two")).clone(),
            (*para("three")).clone(),
        ];
        let expected: Vec<_> = parsed.iter().map(|b| b.id.clone()).collect();

        let update = insert_blocks_after(&tree, &anchor_id, parsed);
        assert!(update.touched);
        let ids: Vec<_> = update.sections[0].content[1..4]
            .iter()
            .map(|b| b.id.clone())
            .collect();
        assert_eq!(ids, expected);
    }
}
