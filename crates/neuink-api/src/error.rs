//! Error types for NeuInk boundary operations.
//!
//! Structural misses inside the editor core (mutating an unknown id) are NOT
//! errors - they are `touched=false` no-ops. Everything here crosses a
//! service boundary and is surfaced to the user as a notification or inline
//! panel by the host.

use miette::Diagnostic;

/// Main error type for NeuInk boundary operations.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum NeuInkError {
    /// Loading the document from the remote source failed.
    #[error("failed to load paper {paper_id}: {reason}")]
    #[diagnostic(code(neuink::load))]
    Load { paper_id: String, reason: String },

    /// Persisting an entity failed.
    #[error("failed to save {entity}: {reason}")]
    #[diagnostic(code(neuink::persist))]
    Persist { entity: String, reason: String },

    /// The text-to-structure parsing service failed outright.
    ///
    /// Per-entry failures in bulk reference parsing are NOT this variant;
    /// those are carried inside `ReferenceParseReport` as partial results.
    #[error("parse service error: {0}")]
    #[diagnostic(code(neuink::parse))]
    Parse(String),

    /// The translation service failed.
    #[error("translation error: {0}")]
    #[diagnostic(code(neuink::translate))]
    Translate(String),

    /// Checking a background job's status failed.
    #[error("job status check failed: {0}")]
    #[diagnostic(code(neuink::job))]
    Job(String),

    /// Serialization/deserialization of a wire payload failed.
    #[error(transparent)]
    #[diagnostic(code(neuink::serde))]
    Serde(#[from] serde_json::Error),
}

impl NeuInkError {
    pub fn load(paper_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            paper_id: paper_id.into(),
            reason: reason.into(),
        }
    }

    pub fn persist(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Persist {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}
