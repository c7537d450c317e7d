//! Outbound content blocks in the chat-completion wire shape

use serde::{Deserialize, Serialize};

use super::message::MessageRole;

/// Reference to a hosted image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Location of the image
    pub url: String,
}

/// One part of a multimodal content list
///
/// Serializes to the chat-completion part shape:
/// `{"type":"text","text":...}` or
/// `{"type":"image_url","image_url":{"url":...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text part
    Text {
        /// The text
        text: String,
    },
    /// Image reference part
    ImageUrl {
        /// The image reference
        image_url: ImageUrl,
    },
}

impl ContentPart {
    /// Create a text part
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Create an image-reference part
    pub fn image_url<S: Into<String>>(url: S) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Content of an outbound block: a plain string or a multimodal part list
///
/// Multimodal content is included whole or excluded whole; it is never
/// partially truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content
    Text(String),
    /// Multimodal content (text + media references)
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Whether this content is a multimodal part list
    pub fn is_multimodal(&self) -> bool {
        matches!(self, MessageContent::Parts(_))
    }

    /// The plain text, when this content is plain text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Parts(_) => None,
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

/// One role-tagged block of the prepared request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Role of the block
    pub role: MessageRole,
    /// Content of the block
    pub content: MessageContent,
}

impl ContentBlock {
    /// Create a block with the given role and content
    pub fn new<C: Into<MessageContent>>(role: MessageRole, content: C) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system block
    pub fn system<C: Into<MessageContent>>(content: C) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user block
    pub fn user<C: Into<MessageContent>>(content: C) -> Self {
        Self::new(MessageRole::User, content)
    }
}
