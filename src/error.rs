//! Error types for catalog and configuration loading
//!
//! The budgeting core itself is total over its inputs and never returns these;
//! only the fallible configuration surface does.

use thiserror::Error;

/// Result type alias for chat-context operations
pub type ChatContextResult<T> = Result<T, ChatContextError>;

/// Error type for chat-context configuration
#[derive(Error, Debug, Clone)]
pub enum ChatContextError {
    /// Model catalog override errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration parse errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChatContextError {
    /// Create a new catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
