//! Context window budgeting for chat conversations
//!
//! This module decides, given a model's token budget, a system prompt,
//! optional extracted file content, and a growing conversation history, which
//! messages to include, in what form, and how to degrade gracefully when the
//! content would exceed the model's input limit.
//!
//! # Example
//!
//! ```
//! use chat_context::{ChatMessage, ContextWindowManager, ModelCatalog};
//!
//! let catalog = ModelCatalog::new();
//! let manager = ContextWindowManager::new(&catalog, "gpt-4o");
//!
//! let history = vec![
//!     ChatMessage::user("What does the attached report say?"),
//!     ChatMessage::assistant("It covers Q3 revenue."),
//! ];
//!
//! let blocks = manager.prepare(&history, "You are a helpful assistant.", None, Some("And Q4?"));
//! assert_eq!(blocks.len(), 4);
//! ```

pub mod estimator;
pub mod format;
pub mod manager;
pub mod strategy;

pub use estimator::{CHARS_PER_TOKEN, TokenEstimator};
pub use format::{TRUNCATION_NOTICE, format_file_context, format_message, truncate_to_tokens};
pub use manager::{ContextInfo, ContextWindowManager, DEFAULT_PRESERVE_RECENT};
pub use strategy::ContextStrategy;
