//! The editing session orchestrator.
//!
//! `EditorSession` owns the document plus all per-session editing state
//! (focus, search, dirty flag, parse target) and is the central dispatch
//! point for semantic `EditAction`s. Mutations apply synchronously against
//! the current tree; the numbered view is recomputed lazily after any
//! touched mutation. Persistence intents are routed to the host's
//! `PersistenceSink` - the session implements no retry or conflict
//! resolution (last local edit wins).

use neuink_model::{BilingualText, Block, LanguageMode, PaperContent, SmolStr, for_each_block};

use neuink_api::{NeuInkError, ParsedReferences, PersistenceSink, ReferenceParseReport};

use crate::focus::{EditFocus, SwitchHooks};
use crate::mutate::{
    self, BlockEdit, InsertPosition, MoveDirection, TreeUpdate,
};
use crate::numbering::{NumberingPolicy, number_document_with};
use crate::search::SearchIndex;

/// Semantic editing operations, decoupled from how they are triggered.
#[derive(Debug, Clone)]
pub enum EditAction {
    InsertBlock {
        anchor: SmolStr,
        position: InsertPosition,
    },
    MoveBlock {
        block_id: SmolStr,
        direction: MoveDirection,
    },
    DeleteBlock {
        block_id: SmolStr,
    },
    DuplicateBlock {
        block_id: SmolStr,
    },
    ReplaceBlock {
        block_id: SmolStr,
        block: Block,
    },
    RenameSection {
        section_id: SmolStr,
        title: BilingualText,
    },
    DeleteSection {
        section_id: SmolStr,
    },
    AddSubsection {
        parent_id: SmolStr,
    },
    AppendSubsectionFromBlock {
        block_id: SmolStr,
    },
    /// Splice blocks returned by the parse service after the anchor block.
    InsertParsedBlocks {
        anchor: SmolStr,
        blocks: Vec<Block>,
    },
}

/// One in-memory editing session over a loaded paper.
pub struct EditorSession {
    doc: PaperContent,
    /// Lazily recomputed numbered view; invalidated by any touched mutation.
    numbered: Option<PaperContent>,
    focus: EditFocus,
    search: SearchIndex,
    /// Block currently hosting the inline text-parsing editor. Mutually
    /// exclusive with the edit-focus target.
    parse_target: Option<SmolStr>,
    language: LanguageMode,
    policy: NumberingPolicy,
    dirty: bool,
}

impl EditorSession {
    pub fn new(doc: PaperContent) -> Self {
        Self {
            doc,
            numbered: None,
            focus: EditFocus::new(),
            search: SearchIndex::new(),
            parse_target: None,
            language: LanguageMode::default(),
            policy: NumberingPolicy::default(),
            dirty: false,
        }
    }

    pub fn with_language(mut self, mode: LanguageMode) -> Self {
        self.language = mode;
        self
    }

    pub fn with_numbering_policy(mut self, policy: NumberingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The source document (un-numbered). Mutations apply against this tree,
    /// never against the numbered view.
    pub fn document(&self) -> &PaperContent {
        &self.doc
    }

    /// The numbered view, recomputed if a mutation invalidated it.
    pub fn numbered(&mut self) -> &PaperContent {
        let doc = &self.doc;
        let policy = &self.policy;
        self.numbered
            .get_or_insert_with(|| number_document_with(doc, policy))
    }

    /// Whether the in-memory document has unsaved structural changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Host calls this after a successful whole-document save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn language(&self) -> LanguageMode {
        self.language
    }

    /// Apply a structural edit. Returns the touched flag: false means the
    /// target id did not match anything and nothing changed (callers must
    /// not re-render or mark dirty in that case).
    pub fn apply(&mut self, action: EditAction) -> bool {
        let update = self.dispatch(action);
        if update.touched {
            self.doc.sections = update.sections;
            self.numbered = None;
            self.dirty = true;
        }
        update.touched
    }

    fn dispatch(&mut self, action: EditAction) -> TreeUpdate {
        let sections = &self.doc.sections;
        match action {
            EditAction::InsertBlock { anchor, position } => {
                mutate::insert_block(sections, &anchor, position, self.language)
            }
            EditAction::MoveBlock {
                block_id,
                direction,
            } => mutate::move_block(sections, &block_id, direction),
            EditAction::DeleteBlock { block_id } => {
                mutate::update_block(sections, &block_id, |_, _| BlockEdit::Remove)
            }
            EditAction::DuplicateBlock { block_id } => {
                mutate::duplicate_block(sections, &block_id)
            }
            EditAction::ReplaceBlock { block_id, block } => {
                mutate::update_block(sections, &block_id, move |_, _| BlockEdit::Replace(block))
            }
            EditAction::RenameSection { section_id, title } => {
                mutate::update_section(sections, &section_id, move |section| {
                    let mut section = section.clone();
                    section.title = title;
                    section
                })
            }
            EditAction::DeleteSection { section_id } => {
                mutate::delete_section(sections, &section_id)
            }
            EditAction::AddSubsection { parent_id } => {
                mutate::add_subsection(sections, &parent_id)
            }
            EditAction::AppendSubsectionFromBlock { block_id } => {
                mutate::append_subsection_from_block(sections, &block_id)
            }
            EditAction::InsertParsedBlocks { anchor, blocks } => {
                mutate::insert_blocks_after(sections, &anchor, blocks)
            }
        }
    }

    // === Edit focus / parse target (one inline surface at a time) ===

    pub fn focus(&self) -> &EditFocus {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut EditFocus {
        &mut self.focus
    }

    /// Open the inline editor on `target`, closing any parse editor first.
    pub fn begin_edit(&mut self, target: &str, hooks: SwitchHooks<'_>) -> bool {
        self.parse_target = None;
        self.focus.switch_to_edit(target, hooks)
    }

    pub fn end_edit(&mut self) {
        self.focus.clear();
    }

    /// Open the inline text-parsing editor under `block_id`, closing any
    /// regular inline editor first.
    pub fn set_parse_target(&mut self, block_id: &str) {
        self.focus.clear();
        self.parse_target = Some(SmolStr::new(block_id));
    }

    pub fn clear_parse_target(&mut self) {
        self.parse_target = None;
    }

    pub fn parse_target(&self) -> Option<&str> {
        self.parse_target.as_deref()
    }

    // === Search ===

    /// Recompute highlights; returns true when the published list changed.
    pub fn search(&mut self, query: &str) -> bool {
        self.search.update(&self.doc.sections, query)
    }

    pub fn highlights(&self) -> &[SmolStr] {
        self.search.results()
    }

    // === References ===

    /// Commit a bulk reference parse into the document. Partial successes
    /// are committed as-is: clean entries and error placeholders both land
    /// in the reference list.
    pub fn commit_references(&mut self, parsed: ParsedReferences) -> ReferenceParseReport {
        let report = neuink_api::merge_references(&mut self.doc.references, parsed);
        if !report.added.is_empty() || !report.updated.is_empty() {
            self.numbered = None;
            self.dirty = true;
        }
        report
    }

    // === Persistence intents ===

    /// Id of the section directly containing the block.
    pub fn owning_section_id(&self, block_id: &str) -> Option<SmolStr> {
        let mut owner = None;
        for_each_block(&self.doc.sections, &mut |section, block| {
            if block.id == block_id && owner.is_none() {
                owner = Some(section.id.clone());
            }
        });
        owner
    }

    /// Save one block through the sink; clears the unsaved-changes flag on
    /// success. The in-memory tree is left untouched on failure - mutations
    /// are local-first, saves are separate explicit acts.
    pub async fn persist_block<S>(&mut self, sink: &S, block_id: &str) -> Result<(), NeuInkError>
    where
        S: PersistenceSink + Sync,
    {
        let section_id = self
            .owning_section_id(block_id)
            .ok_or_else(|| NeuInkError::persist(block_id, "no section contains this block"))?;
        sink.save_block(block_id, &section_id).await?;
        self.focus.confirm_saved();
        Ok(())
    }

    /// Save a section title through the sink's dedicated capability.
    pub async fn persist_section_title<S>(
        &mut self,
        sink: &S,
        section_id: &str,
    ) -> Result<(), NeuInkError>
    where
        S: PersistenceSink + Sync,
    {
        sink.save_section_title(section_id).await?;
        self.focus.confirm_saved();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::Arc as StdArc;
    use std::sync::Mutex;

    use neuink_model::{BilingualInlines, BlockKind, Section};

    fn para(text: &str) -> StdArc<Block> {
        StdArc::new(Block::new(BlockKind::Paragraph {
            content: BilingualInlines::text(text, ""),
        }))
    }

    fn make_session() -> (EditorSession, SmolStr, SmolStr) {
        let block = para("hello");
        let block_id = block.id.clone();
        let mut section = Section::new(BilingualText::english("Intro"));
        section.content = vec![block];
        let section_id = section.id.clone();
        let doc = PaperContent {
            sections: vec![StdArc::new(section)],
            ..Default::default()
        };
        (EditorSession::new(doc), block_id, section_id)
    }

    #[test]
    fn test_apply_sets_dirty_and_invalidates_numbered_view() {
        let (mut session, block_id, _) = make_session();
        assert!(!session.is_dirty());
        assert_eq!(session.numbered().sections[0].number.as_deref(), Some("1"));

        let touched = session.apply(EditAction::DuplicateBlock {
            block_id: block_id.clone(),
        });
        assert!(touched);
        assert!(session.is_dirty());
        assert_eq!(session.numbered().sections[0].content.len(), 2);
    }

    #[test]
    fn test_noop_mutation_does_not_dirty() {
        let (mut session, _, _) = make_session();
        let touched = session.apply(EditAction::DeleteBlock {
            block_id: "missing".into(),
        });
        assert!(!touched);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_edit_focus_exclusive_with_parse_target() {
        let (mut session, block_id, _) = make_session();

        session.begin_edit(&block_id, SwitchHooks::none());
        assert!(session.focus().is_editing(&block_id));

        session.set_parse_target(&block_id);
        assert_eq!(session.parse_target(), Some(block_id.as_str()));
        assert_eq!(session.focus().current(), None);

        session.begin_edit(&block_id, SwitchHooks::none());
        assert_eq!(session.parse_target(), None);
        assert!(session.focus().is_editing(&block_id));
    }

    #[test]
    fn test_switch_flushes_outgoing_once() {
        let (mut session, block_id, section_id) = make_session();
        session.begin_edit(&block_id, SwitchHooks::none());

        let saved: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let hooks =
            SwitchHooks::none().with_on_request_save(|id| saved.borrow_mut().push(id.into()));
        session.begin_edit(&section_id, hooks);

        assert!(session.focus().is_editing(&section_id));
        assert_eq!(saved.borrow().as_slice(), [block_id.as_str()]);
    }

    #[test]
    fn test_insert_parsed_blocks() {
        let (mut session, block_id, _) = make_session();
        let parsed = vec![
            (*para("first parsed")).clone(),
            (*para("second parsed")).clone(),
        ];
        assert!(session.apply(EditAction::InsertParsedBlocks {
            anchor: block_id,
            blocks: parsed,
        }));
        assert_eq!(session.document().sections[0].content.len(), 3);
    }

    #[test]
    fn test_commit_references_partial_success() {
        let (mut session, _, _) = make_session();
        let parsed = neuink_api::parse_reference_lines(
            "[1] A. Author, Title, 2020.\n<malformed entry>",
        );
        let report = session.commit_references(parsed);

        assert_eq!(report.added.len(), 2);
        assert_eq!(report.result.errors.len(), 1);
        // One clean plus one error placeholder, never fewer.
        assert_eq!(session.document().references.len(), 2);
        assert_eq!(session.numbered().references[0].number, Some(1));
        assert_eq!(session.numbered().references[1].number, Some(2));
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<String>>,
    }

    impl PersistenceSink for RecordingSink {
        async fn save_block(&self, block_id: &str, section_id: &str) -> Result<(), NeuInkError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("block {block_id} in {section_id}"));
            Ok(())
        }

        async fn save_section_title(&self, section_id: &str) -> Result<(), NeuInkError> {
            self.calls.lock().unwrap().push(format!("title {section_id}"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_persist_block_resolves_owning_section() {
        let (mut session, block_id, section_id) = make_session();
        session.focus_mut().mark_unsaved();

        let sink = RecordingSink::default();
        session.persist_block(&sink, &block_id).await.unwrap();

        assert_eq!(
            sink.calls.lock().unwrap().as_slice(),
            [format!("block {block_id} in {section_id}")]
        );
        assert!(!session.focus().has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_persist_unknown_block_is_an_error() {
        let (mut session, _, _) = make_session();
        let sink = RecordingSink::default();
        let err = session.persist_block(&sink, "missing").await.unwrap_err();
        assert!(matches!(err, NeuInkError::Persist { .. }));
        assert!(sink.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_section_title_uses_dedicated_capability() {
        let (mut session, _, section_id) = make_session();
        let sink = RecordingSink::default();
        session
            .persist_section_title(&sink, &section_id)
            .await
            .unwrap();
        assert_eq!(
            sink.calls.lock().unwrap().as_slice(),
            [format!("title {section_id}")]
        );
    }
}
