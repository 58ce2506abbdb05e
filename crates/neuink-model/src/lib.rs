//! neuink-model: the content tree data model for NeuInk papers.
//!
//! This crate provides:
//! - `BilingualText` / `Inline` / `BilingualInlines` - bilingual plain and rich text
//! - `Block` / `BlockKind` - the tagged union of content block variants
//! - `Section` - the recursive heading hierarchy owning blocks and subsections
//! - `Reference` - bibliographic entries
//! - `PaperContent` - the aggregate root a paper document loads into
//!
//! Tree children are `Arc`-wrapped so that mutation passes can rebuild only
//! the path from root to the mutated node while untouched subtrees keep
//! pointer identity (`Arc::ptr_eq`). Nothing in this crate mutates a shared
//! node in place.

pub mod block;
pub mod ids;
pub mod paper;
pub mod reference;
pub mod section;
pub mod text;

pub use block::{Block, BlockKind};
pub use ids::fresh_id;
pub use paper::{Attachment, PaperContent, PaperMetadata};
pub use reference::Reference;
pub use section::{Section, find_section, for_each_block, for_each_section};
pub use smol_str::SmolStr;
pub use text::{BilingualInlines, BilingualText, Inline, LanguageMode};
