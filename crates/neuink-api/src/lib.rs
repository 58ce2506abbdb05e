//! neuink-api: boundary contracts between the NeuInk editor core and the
//! remote services it talks to.
//!
//! The editor core never performs network I/O itself. Everything that leaves
//! the process - loading a paper, saving an entity, parsing pasted text,
//! translating, bulk-importing references, polling a background parse job -
//! goes through the async traits defined here. Hosts provide the concrete
//! HTTP implementations; tests provide in-memory fakes.

pub mod error;
pub mod job;
pub mod parse;
pub mod persist;
pub mod references;
pub mod source;
pub mod translate;

pub use error::NeuInkError;
pub use job::{BlockParseStatus, JobKey, JobPoller, JobStatus, StatusProbe};
pub use parse::{ParseEvent, ParseProgress, TextParser};
pub use persist::PersistenceSink;
pub use references::{
    ParsedReferences, ReferenceParseError, ReferenceParseReport, ReferenceParser,
    merge_references, parse_reference_lines,
};
pub use source::DocumentSource;
pub use translate::{Translation, TranslationRequest, Translator};
