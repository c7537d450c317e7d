//! Conversation message types shared across the catalog and context modules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (instructions)
    System,
    /// User message (human input)
    User,
    /// Assistant message (model response)
    Assistant,
}

impl Default for MessageRole {
    fn default() -> Self {
        MessageRole::User
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// Kind of message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text message
    Text,
    /// Message carrying a file attachment
    File,
}

impl Default for MessageKind {
    fn default() -> Self {
        MessageKind::Text
    }
}

/// Free-form attachment metadata recorded by the upload pipeline
///
/// Only `is_image` is interpreted by this crate; everything else is carried
/// through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Whether the attachment is an image the model can view
    #[serde(default, rename = "isImage")]
    pub is_image: bool,
    /// Everything else the upload pipeline recorded
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A file attached to a persisted conversation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Hosted location of the file, when available
    pub url: Option<String>,
    /// Original file name
    pub name: String,
    /// MIME type
    #[serde(rename = "fileType")]
    pub file_type: String,
    /// Size in bytes
    pub size: Option<u64>,
    /// Plain-text extraction of the file contents
    #[serde(rename = "extractedText")]
    pub extracted_text: Option<String>,
    /// Vision/analysis summary produced upstream, if any
    pub analysis: Option<String>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: FileMetadata,
}

impl FileAttachment {
    /// Create an attachment with just a name and MIME type
    pub fn new<S: Into<String>>(name: S, file_type: S) -> Self {
        Self {
            url: None,
            name: name.into(),
            file_type: file_type.into(),
            size: None,
            extracted_text: None,
            analysis: None,
            metadata: FileMetadata::default(),
        }
    }

    /// Mark the attachment as an image hosted at `url`
    pub fn image<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self.metadata.is_image = true;
        self
    }

    /// Attach extracted text
    pub fn with_extracted_text<S: Into<String>>(mut self, text: S) -> Self {
        self.extracted_text = Some(text.into());
        self
    }

    /// Attach an analysis summary
    pub fn with_analysis<S: Into<String>>(mut self, analysis: S) -> Self {
        self.analysis = Some(analysis.into());
        self
    }
}

/// One turn in a conversation
///
/// Messages are created by the chat-handling layer and are read-only to this
/// crate: budgeting only consumes a slice of prior messages and never writes
/// them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Opaque unique identifier
    pub id: String,
    /// Text content (may be empty when a file is attached)
    pub content: String,
    /// Role of the sender
    pub role: MessageRole,
    /// Creation time, used for ordering/display only
    pub timestamp: DateTime<Utc>,
    /// Kind of content
    #[serde(default, rename = "type")]
    pub kind: MessageKind,
    /// Attachment payload, present only for file messages
    pub file: Option<FileAttachment>,
}

impl ChatMessage {
    fn with_role<S: Into<String>>(role: MessageRole, content: S) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
            kind: MessageKind::Text,
            file: None,
        }
    }

    /// Create a new system message
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::with_role(MessageRole::System, content)
    }

    /// Create a new user message
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::with_role(MessageRole::User, content)
    }

    /// Create a new assistant message
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }

    /// Create a new user message carrying a file attachment
    pub fn file<S: Into<String>>(content: S, file: FileAttachment) -> Self {
        Self {
            kind: MessageKind::File,
            file: Some(file),
            ..Self::with_role(MessageRole::User, content)
        }
    }

    /// Whether this message carries a usable file payload
    pub fn has_file(&self) -> bool {
        self.kind == MessageKind::File && self.file.is_some()
    }
}

/// Request-scoped file payload produced by the upstream file processor
///
/// Distinct from a persisted [`FileAttachment`]: consumed once per chat turn
/// and discarded after the context is prepared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileData {
    /// Original file name
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// MIME type
    #[serde(rename = "fileType")]
    pub file_type: String,
    /// Size in bytes
    #[serde(rename = "fileSize")]
    pub file_size: Option<u64>,
    /// Plain-text extraction of the file contents
    #[serde(rename = "extractedText")]
    pub extracted_text: Option<String>,
}

impl FileData {
    /// Create a new payload with extracted text
    pub fn new<S: Into<String>>(file_name: S, file_type: S, extracted_text: S) -> Self {
        Self {
            file_name: file_name.into(),
            file_type: file_type.into(),
            file_size: None,
            extracted_text: Some(extracted_text.into()),
        }
    }

    /// Set the file size in bytes
    pub fn with_size(mut self, bytes: u64) -> Self {
        self.file_size = Some(bytes);
        self
    }

    /// Whether the payload carries any extracted text
    pub fn has_text(&self) -> bool {
        self.extracted_text
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }
}
