//! Bilingual text and inline content nodes.
//!
//! Every piece of user-visible text in a paper exists in up to two language
//! variants (English and Chinese). Plain fields use `BilingualText`; rich
//! content is a sequence of `Inline` nodes per language.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Which language variants the editor currently displays.
///
/// Controls which variants a freshly inserted placeholder block is seeded
/// with, and which variants the renderer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageMode {
    /// Show and seed both languages.
    #[default]
    Both,
    /// English only.
    EnglishOnly,
    /// Chinese only.
    ChineseOnly,
}

impl LanguageMode {
    pub fn shows_english(self) -> bool {
        matches!(self, Self::Both | Self::EnglishOnly)
    }

    pub fn shows_chinese(self) -> bool {
        matches!(self, Self::Both | Self::ChineseOnly)
    }
}

/// A pair of plain-text language variants (titles, abstracts, captions).
///
/// Either side may be empty; an entirely empty pair usually means the field
/// was never filled in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BilingualText {
    pub en: String,
    pub zh: String,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, zh: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            zh: zh.into(),
        }
    }

    /// English-only text with an empty Chinese variant.
    pub fn english(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            zh: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.zh.is_empty()
    }

    /// Append both variants to a plain-text buffer (search extraction).
    pub fn write_plain(&self, out: &mut String) {
        push_separated(out, &self.en);
        push_separated(out, &self.zh);
    }
}

/// One inline node inside rich block content.
///
/// Cross-reference variants (`FigureRef` etc.) carry the display text the
/// host resolved at parse time; the `target` is the id of the referenced
/// entity. Search extraction flattens the display text of every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Inline {
    Text { text: String },
    Link { text: String, href: String },
    InlineMath { latex: String },
    Citation { key: SmolStr, text: String },
    FigureRef { target: SmolStr, text: String },
    TableRef { target: SmolStr, text: String },
    SectionRef { target: SmolStr, text: String },
    EquationRef { target: SmolStr, text: String },
    Footnote { text: String },
}

impl Inline {
    /// Plain text node.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }

    /// Append this node's extracted plain text to a buffer.
    ///
    /// Inline math contributes its LaTeX source; everything else contributes
    /// its display text.
    pub fn write_plain(&self, out: &mut String) {
        match self {
            Self::Text { text }
            | Self::Link { text, .. }
            | Self::Citation { text, .. }
            | Self::FigureRef { text, .. }
            | Self::TableRef { text, .. }
            | Self::SectionRef { text, .. }
            | Self::EquationRef { text, .. }
            | Self::Footnote { text } => out.push_str(text),
            Self::InlineMath { latex } => out.push_str(latex),
        }
    }
}

/// Rich inline content, one sequence per language variant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BilingualInlines {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub en: Vec<Inline>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zh: Vec<Inline>,
}

impl BilingualInlines {
    /// Single text node per non-empty variant.
    pub fn text(en: &str, zh: &str) -> Self {
        let mut inlines = Self::default();
        if !en.is_empty() {
            inlines.en.push(Inline::text(en));
        }
        if !zh.is_empty() {
            inlines.zh.push(Inline::text(zh));
        }
        inlines
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.zh.is_empty()
    }

    /// Append the extracted plain text of both variants to a buffer.
    pub fn write_plain(&self, out: &mut String) {
        for node in self.en.iter().chain(self.zh.iter()) {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            node.write_plain(out);
        }
    }
}

fn push_separated(out: &mut String, s: &str) {
    if s.is_empty() {
        return;
    }
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
    out.push_str(s);
}
