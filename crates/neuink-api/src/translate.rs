//! Translation service boundary.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::NeuInkError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub model_id: SmolStr,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub translated_text: String,
}

/// The remote translation service.
#[trait_variant::make(Send)]
pub trait Translator {
    async fn translate(&self, request: TranslationRequest) -> Result<Translation, NeuInkError>;
}
