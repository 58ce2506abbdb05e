//! Persistence intents.
//!
//! Saves are whole-entity: no field diffing contract exists, the server
//! receives the entity and recomputes derived numbers itself. Saving a
//! section title is a distinct capability rather than a block save with a
//! sentinel id.

use crate::error::NeuInkError;

/// Where edited entities are saved.
#[trait_variant::make(Send)]
pub trait PersistenceSink {
    /// Persist the block and the section that owns it.
    async fn save_block(&self, block_id: &str, section_id: &str) -> Result<(), NeuInkError>;

    /// Persist a section's title.
    async fn save_section_title(&self, section_id: &str) -> Result<(), NeuInkError>;
}
