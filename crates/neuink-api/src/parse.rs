//! Text-to-structure parsing.
//!
//! The parse service turns pasted raw text into content blocks. The plain
//! variant returns everything at once; the streaming variant emits progress
//! events over a channel and finishes with a terminal event.

use neuink_model::{Block, PaperContent};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tokio::sync::mpsc;

use crate::error::NeuInkError;

/// Progress report from a streaming parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseProgress {
    pub message: String,
    /// 0.0 ..= 1.0
    pub progress: f32,
    pub session_id: SmolStr,
}

/// Events emitted by the streaming parse variant.
///
/// Exactly one terminal event (`Complete` or `Failed`) ends the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParseEvent {
    Progress(ParseProgress),
    Complete {
        blocks: Vec<Block>,
        /// Present when the service re-parsed paper-level data as well.
        paper: Option<PaperContent>,
    },
    Failed {
        error: String,
    },
}

/// The remote text-to-structure parser.
#[trait_variant::make(Send)]
pub trait TextParser {
    /// Parse `text` into blocks destined for `section_id`, optionally to be
    /// inserted after `after_block_id`.
    async fn parse_text(
        &self,
        section_id: &str,
        text: &str,
        after_block_id: Option<&str>,
    ) -> Result<Vec<Block>, NeuInkError>;

    /// Streaming variant: progress and the terminal result are pushed into
    /// `events`. The call returns once the terminal event has been sent.
    async fn parse_text_streaming(
        &self,
        section_id: &str,
        text: &str,
        events: mpsc::Sender<ParseEvent>,
    ) -> Result<(), NeuInkError>;
}
