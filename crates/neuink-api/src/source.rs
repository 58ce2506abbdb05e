//! Document loading.

use neuink_model::PaperContent;

use crate::error::NeuInkError;

/// Where paper documents come from.
///
/// The returned document is the raw (un-numbered) aggregate root; callers
/// run the numbering pass before rendering.
#[trait_variant::make(Send)]
pub trait DocumentSource {
    async fn load_document(&self, paper_id: &str) -> Result<PaperContent, NeuInkError>;
}
