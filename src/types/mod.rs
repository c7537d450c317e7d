//! Shared types for the context-window budgeting core (Layer 0)
//!
//! **Layer 0 principle**: `types/` depends only on external crates
//! (serde, chrono, uuid), never on other modules of this crate.

pub mod content;
pub mod message;

pub use content::{ContentBlock, ContentPart, ImageUrl, MessageContent};
pub use message::{ChatMessage, FileAttachment, FileData, FileMetadata, MessageKind, MessageRole};
