//! Search/highlight indexing over the document tree.
//!
//! Matching is case-insensitive substring search over each block's extracted
//! plain text (all inline node kinds, both language variants), in document
//! traversal order. Re-computation happens only when the normalized query or
//! the section-tree identity changes, and a new result list is published
//! only when it differs element-wise from the previous one - downstream
//! subscribers can treat every publication as a real change.

use std::sync::Arc;

use neuink_model::{Section, SmolStr, for_each_block};

/// Incrementally maintained list of matching block ids.
#[derive(Default)]
pub struct SearchIndex {
    query: String,
    tree: Vec<Arc<Section>>,
    results: Vec<SmolStr>,
    primed: bool,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute against the given tree and query.
    ///
    /// Returns true only when a new result list was published. An empty
    /// (or all-whitespace) query yields an empty result, published only if
    /// the previous result was non-empty.
    pub fn update(&mut self, sections: &[Arc<Section>], query: &str) -> bool {
        let normalized = query.trim().to_lowercase();
        if self.primed && normalized == self.query && same_tree(&self.tree, sections) {
            return false;
        }

        self.primed = true;
        self.query = normalized;
        self.tree = sections.to_vec();

        let matches = if self.query.is_empty() {
            Vec::new()
        } else {
            compute_matches(sections, &self.query)
        };

        if matches == self.results {
            return false;
        }
        tracing::trace!(query = %self.query, hits = matches.len(), "search results changed");
        self.results = matches;
        true
    }

    /// The current match list, in document order.
    pub fn results(&self) -> &[SmolStr] {
        &self.results
    }
}

fn compute_matches(sections: &[Arc<Section>], query: &str) -> Vec<SmolStr> {
    let mut matches = Vec::new();
    for_each_block(sections, &mut |_, block| {
        if block.plain_text().to_lowercase().contains(query) {
            matches.push(block.id.clone());
        }
    });
    matches
}

/// Element-wise `Arc` identity over the root handles. A mutation pass always
/// replaces at least one root-path handle, so this is a sound change signal.
fn same_tree(a: &[Arc<Section>], b: &[Arc<Section>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}
