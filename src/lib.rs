//! Context-window budgeting for a chat application
//!
//! This crate is the token-budgeting core of a chat client: it turns a model
//! identifier, a system prompt, optional extracted file content, conversation
//! history, and the in-flight user message into an ordered list of role-tagged
//! content blocks that fit inside the model's input budget. Request handling,
//! persistence, authentication, and the provider call itself live in the
//! surrounding application, not here.
//!
//! The crate performs no I/O and holds no shared mutable state: a
//! [`ContextWindowManager`] is immutable configuration, and
//! [`prepare`](ContextWindowManager::prepare) is a pure function of its
//! arguments. Oversized input never produces an error; content is truncated
//! or selectively excluded so that every call yields something sendable.

pub mod catalog;
pub mod context;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use catalog::{DEFAULT_MODEL_ID, DEFAULT_RESERVE_TOKENS, ModelCatalog, ModelConfig, PricingTier};
pub use context::{
    ContextInfo, ContextStrategy, ContextWindowManager, DEFAULT_PRESERVE_RECENT, TokenEstimator,
};
pub use error::{ChatContextError, ChatContextResult};
pub use types::{
    ChatMessage, ContentBlock, ContentPart, FileAttachment, FileData, FileMetadata, ImageUrl,
    MessageContent, MessageKind, MessageRole,
};
