//! neuink-editor: pure editing logic for NeuInk paper documents.
//!
//! This crate provides:
//! - `numbering` - the pure pass assigning section/figure/table/equation/
//!   reference numbers, and its inverse `strip_numbers`
//! - `mutate` - copy-on-write structural edits over the section tree, each
//!   reporting a `touched` flag
//! - `focus` - the edit-focus arbiter (at most one inline editor open)
//! - `search` - the search/highlight indexer with stable re-computation
//! - `session` - `EditorSession`, the orchestrator dispatching semantic
//!   `EditAction`s and routing persistence intents
//!
//! Nothing here performs I/O; the boundary traits live in `neuink-api`.

pub mod focus;
pub mod mutate;
pub mod numbering;
pub mod search;
pub mod session;

pub use focus::{EditFocus, FocusState, SwitchHooks};
pub use mutate::{
    BlockEdit, InsertPosition, MoveDirection, TreeUpdate, add_subsection,
    append_subsection_from_block, delete_section, duplicate_block, insert_block,
    insert_blocks_after, move_block, update_block, update_section,
};
pub use numbering::{NumberingPolicy, number_document, number_document_with, strip_numbers};
pub use search::SearchIndex;
pub use session::{EditAction, EditorSession};
