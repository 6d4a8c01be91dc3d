//! The external language-model boundary.
//!
//! The model is treated as an opaque remote function: given a credential and a
//! prompt it returns raw text or fails. Everything the rest of the crate needs
//! from it (prompt construction, reply parsing) lives in the submodules:
//!
//! - [`prompts`]: prompt text for classification, breakdown, coaching and mood
//!   requests
//! - [`reply`]: fence stripping and typed reply parsing
//! - [`gemini`]: the default HTTP implementation of [`AiBoundary`]

use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;
pub mod prompts;
pub mod reply;

pub use gemini::{AiConfig, GeminiClient};
pub use reply::{
    AiReply, BreakdownReply, ClassificationReply, CoachingReply, MoodReply,
};

/// Failure of a single call across the AI boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// The provider refused the credential; fatal for a whole batch
    #[error("API key rejected: {0}")]
    InvalidCredential(String),
    /// The provider answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),
    /// The response envelope carried no text
    #[error("empty response: {0}")]
    EmptyResponse(String),
}

impl AiError {
    pub fn is_credential(&self) -> bool {
        matches!(self, AiError::InvalidCredential(_))
    }
}

/// An opaque `prompt -> text` language model.
#[async_trait]
pub trait AiBoundary: Send + Sync {
    /// Sends `prompt` using `credential` and returns the raw reply text.
    async fn generate(&self, credential: &str, prompt: &str) -> Result<String, AiError>;
}

/// Shortens `text` to at most `max` characters for diagnostics.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
