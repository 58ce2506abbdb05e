//! Content blocks: the tagged union of everything a section can contain.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::ids::fresh_id;
use crate::text::{BilingualInlines, LanguageMode};

/// One unit of document content.
///
/// `number` is derived: the numbering pass assigns it to figures, tables and
/// equations, and `strip_numbers` removes it before the document goes back to
/// the persistence layer (which recomputes numbers itself).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(flatten)]
    pub kind: BlockKind,
}

/// Block variants and their payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockKind {
    Paragraph {
        content: BilingualInlines,
    },
    Heading {
        level: u8,
        content: BilingualInlines,
    },
    Math {
        latex: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<SmolStr>,
    },
    Figure {
        src: String,
        caption: BilingualInlines,
    },
    Table {
        caption: BilingualInlines,
        header: Vec<BilingualInlines>,
        rows: Vec<Vec<BilingualInlines>>,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<SmolStr>,
        code: String,
    },
    OrderedList {
        items: Vec<BilingualInlines>,
    },
    UnorderedList {
        items: Vec<BilingualInlines>,
    },
    Quote {
        content: BilingualInlines,
    },
    Divider,
}

impl BlockKind {
    /// The discriminant string, also used as the id prefix for this variant.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { .. } => "heading",
            Self::Math { .. } => "math",
            Self::Figure { .. } => "figure",
            Self::Table { .. } => "table",
            Self::Code { .. } => "code",
            Self::OrderedList { .. } => "ordered-list",
            Self::UnorderedList { .. } => "unordered-list",
            Self::Quote { .. } => "quote",
            Self::Divider => "divider",
        }
    }

    /// Whether the numbering pass assigns a sequence number to this variant.
    pub fn is_numbered(&self) -> bool {
        matches!(
            self,
            Self::Figure { .. } | Self::Table { .. } | Self::Math { .. }
        )
    }

    /// Append the extracted plain text of this variant to a buffer.
    pub fn write_plain(&self, out: &mut String) {
        match self {
            Self::Paragraph { content }
            | Self::Heading { content, .. }
            | Self::Quote { content } => content.write_plain(out),
            Self::Math { latex, .. } => {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(latex);
            }
            Self::Figure { caption, .. } | Self::Table { caption, .. } => {
                caption.write_plain(out);
                if let Self::Table { header, rows, .. } = self {
                    for cell in header {
                        cell.write_plain(out);
                    }
                    for row in rows {
                        for cell in row {
                            cell.write_plain(out);
                        }
                    }
                }
            }
            Self::Code { code, .. } => {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(code);
            }
            Self::OrderedList { items } | Self::UnorderedList { items } => {
                for item in items {
                    item.write_plain(out);
                }
            }
            Self::Divider => {}
        }
    }
}

impl Block {
    /// New block with a fresh id and no derived number.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: fresh_id(kind.type_tag()),
            number: None,
            kind,
        }
    }

    /// Placeholder paragraph for block insertion.
    ///
    /// If both languages are active both variants are seeded; otherwise only
    /// the active one.
    pub fn placeholder_paragraph(mode: LanguageMode) -> Self {
        let en = if mode.shows_english() {
            "New paragraph"
        } else {
            ""
        };
        let zh = if mode.shows_chinese() { "新段落" } else { "" };
        Self::new(BlockKind::Paragraph {
            content: BilingualInlines::text(en, zh),
        })
    }

    /// Structural deep copy with a freshly generated id.
    ///
    /// The payload is copied field-by-field via `Clone`, never through a
    /// serialize/deserialize round trip. The derived number is dropped; the
    /// next numbering pass reassigns it.
    pub fn duplicate(&self) -> Self {
        Self {
            id: fresh_id(self.kind.type_tag()),
            number: None,
            kind: self.kind.clone(),
        }
    }

    /// Extracted plain text of the whole block, both languages.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.kind.write_plain(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_gets_new_id_same_payload() {
        let block = Block::new(BlockKind::Paragraph {
            content: BilingualInlines::text("hello", "你好"),
        });
        let copy = block.duplicate();
        assert_ne!(copy.id, block.id);
        assert_eq!(copy.kind, block.kind);
        assert_eq!(copy.number, None);
    }

    #[test]
    fn test_placeholder_respects_language_mode() {
        let both = Block::placeholder_paragraph(LanguageMode::Both);
        let BlockKind::Paragraph { content } = &both.kind else {
            panic!("placeholder must be a paragraph");
        };
        assert!(!content.en.is_empty());
        assert!(!content.zh.is_empty());

        let zh_only = Block::placeholder_paragraph(LanguageMode::ChineseOnly);
        let BlockKind::Paragraph { content } = &zh_only.kind else {
            panic!("placeholder must be a paragraph");
        };
        assert!(content.en.is_empty());
        assert!(!content.zh.is_empty());
    }

    #[test]
    fn test_numbered_variants() {
        assert!(
            BlockKind::Math {
                latex: "x".into(),
                label: None
            }
            .is_numbered()
        );
        assert!(
            !BlockKind::Code {
                language: None,
                code: String::new()
            }
            .is_numbered()
        );
        assert!(!BlockKind::Divider.is_numbered());
    }

    #[test]
    fn test_block_serde_skips_absent_number() {
        let block = Block::new(BlockKind::Divider);
        let json = serde_json::to_string(&block).unwrap();
        assert!(!json.contains("number"));
        assert!(json.contains(r#""type":"divider""#));
    }
}
