//! Derived numbering for the document tree.
//!
//! `number_document` is pure and total: it rebuilds the tree with every
//! derived number assigned and never mutates its input. Section numbers are
//! dotted sibling paths (`"2.3.1"`); figures, tables and equations get
//! global counters in depth-first document order, ignoring section
//! boundaries; references are numbered by array position. Because numbers
//! are recomputed from scratch, running the pass twice yields the same
//! output.

use std::sync::Arc;

use neuink_model::{Block, BlockKind, PaperContent, Section, SmolStr};

/// Which entity kinds receive numbers.
///
/// Figures and tables are always numbered. Equation numbering is
/// unconditional by default (every math block), but configurable for hosts
/// that only want referenced equations numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingPolicy {
    pub number_equations: bool,
}

impl Default for NumberingPolicy {
    fn default() -> Self {
        Self {
            number_equations: true,
        }
    }
}

#[derive(Default)]
struct Counters {
    figures: u32,
    tables: u32,
    equations: u32,
}

/// Assign every derived number with the default policy.
pub fn number_document(doc: &PaperContent) -> PaperContent {
    number_document_with(doc, &NumberingPolicy::default())
}

/// Assign every derived number.
pub fn number_document_with(doc: &PaperContent, policy: &NumberingPolicy) -> PaperContent {
    let mut counters = Counters::default();
    let sections = number_sections(&doc.sections, "", &mut counters, policy);
    let references = doc
        .references
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut r = r.clone();
            r.number = Some(i as u32 + 1);
            r
        })
        .collect();

    PaperContent {
        sections,
        references,
        ..doc.clone()
    }
}

/// Remove every derived number.
///
/// Used before handing the document to a persistence layer that recomputes
/// numbers itself, so stale numbers are never stored.
pub fn strip_numbers(doc: &PaperContent) -> PaperContent {
    let sections = strip_sections(&doc.sections);
    let references = doc
        .references
        .iter()
        .map(|r| {
            let mut r = r.clone();
            r.number = None;
            r
        })
        .collect();

    PaperContent {
        sections,
        references,
        ..doc.clone()
    }
}

fn number_sections(
    sections: &[Arc<Section>],
    prefix: &str,
    counters: &mut Counters,
    policy: &NumberingPolicy,
) -> Vec<Arc<Section>> {
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let number = if prefix.is_empty() {
                format!("{}", i + 1)
            } else {
                format!("{prefix}.{}", i + 1)
            };
            // Own content before subsections: depth-first pre-order.
            let content = section
                .content
                .iter()
                .map(|block| Arc::new(number_block(block, counters, policy)))
                .collect();
            let subsections = number_sections(&section.subsections, &number, counters, policy);
            Arc::new(Section {
                id: section.id.clone(),
                title: section.title.clone(),
                content,
                subsections,
                number: Some(SmolStr::new(&number)),
            })
        })
        .collect()
}

fn number_block(block: &Block, counters: &mut Counters, policy: &NumberingPolicy) -> Block {
    let number = match &block.kind {
        BlockKind::Figure { .. } => {
            counters.figures += 1;
            Some(counters.figures)
        }
        BlockKind::Table { .. } => {
            counters.tables += 1;
            Some(counters.tables)
        }
        BlockKind::Math { .. } if policy.number_equations => {
            counters.equations += 1;
            Some(counters.equations)
        }
        // Stale numbers on non-numbered variants are cleared, not kept.
        _ => None,
    };
    Block {
        id: block.id.clone(),
        number,
        kind: block.kind.clone(),
    }
}

fn strip_sections(sections: &[Arc<Section>]) -> Vec<Arc<Section>> {
    sections
        .iter()
        .map(|section| {
            Arc::new(Section {
                id: section.id.clone(),
                title: section.title.clone(),
                content: section
                    .content
                    .iter()
                    .map(|b| {
                        Arc::new(Block {
                            id: b.id.clone(),
                            number: None,
                            kind: b.kind.clone(),
                        })
                    })
                    .collect(),
                subsections: strip_sections(&section.subsections),
                number: None,
            })
        })
        .collect()
}
