//! Token estimation for context budgeting
//!
//! Exact tokenization varies by provider, so this uses a deliberately coarse
//! character-count heuristic (English prose averages ~4 characters per token).
//! The budgeting algorithm only needs a consistent integer cost per content
//! unit; swap in a real tokenizer behind the same surface if provider parity
//! is ever required.

use crate::types::MessageContent;

/// Average characters per token
pub const CHARS_PER_TOKEN: usize = 4;

/// Deterministic token-count approximation, no external calls
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenEstimator;

impl TokenEstimator {
    /// Create a new estimator
    pub fn new() -> Self {
        Self
    }

    /// Estimate tokens for a string: `ceil(len / 4)`
    ///
    /// Total over all inputs; the empty string yields 0.
    pub fn estimate_str(&self, text: &str) -> usize {
        text.len().div_ceil(CHARS_PER_TOKEN)
    }

    /// Estimate tokens for a content block payload
    ///
    /// Multimodal part lists are serialized to their JSON wire form first and
    /// estimated as a string.
    pub fn estimate_content(&self, content: &MessageContent) -> usize {
        match content {
            MessageContent::Text(text) => self.estimate_str(text),
            MessageContent::Parts(parts) => {
                let serialized = serde_json::to_string(parts).unwrap_or_default();
                self.estimate_str(&serialized)
            }
        }
    }
}
