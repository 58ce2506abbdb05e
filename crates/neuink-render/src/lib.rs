//! neuink-render: HTML renderer for the numbered paper view.
//!
//! The renderer walks a numbered `PaperContent` root-to-leaf and writes
//! HTML. It is a pure view: it never mutates the tree and carries no state
//! of its own beyond the `RenderState` snapshot it is given (display
//! language, search highlights, the single active inline-editing surface).
//!
//! Sections carry their dotted number and depth; each block carries
//! first/last boundary attributes so the host can disable move-up/move-down
//! at tree edges without re-deriving positions.

mod html;

use neuink_model::{LanguageMode, PaperContent, SmolStr};

pub use html::{push_html, write_html_fmt};

/// Per-render snapshot of the editing UI state.
///
/// `editing` and `parse_target` are mutually exclusive by construction in
/// the session layer; if a caller passes both, the edit target wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderState<'a> {
    pub language: LanguageMode,
    /// Block ids to mark as search hits, in document order.
    pub highlights: &'a [SmolStr],
    /// Entity currently open in the inline editor.
    pub editing: Option<&'a str>,
    /// Block currently hosting the inline text-parsing editor.
    pub parse_target: Option<&'a str>,
}

impl<'a> RenderState<'a> {
    fn is_highlighted(&self, block_id: &str) -> bool {
        self.highlights.iter().any(|id| id == block_id)
    }

    fn is_editing(&self, id: &str) -> bool {
        self.editing == Some(id)
    }

    fn is_parse_target(&self, id: &str) -> bool {
        self.editing.is_none() && self.parse_target == Some(id)
    }
}

/// Render the whole numbered document to an HTML string.
pub fn render_paper(doc: &PaperContent, state: &RenderState<'_>) -> String {
    let mut out = String::new();
    push_html(&mut out, doc, state);
    out
}
