//! Error types for loading and aggregating chat exports.

use thiserror::Error;

use crate::ChatId;

/// Errors that can occur while loading a chat export into a session.
///
/// Every variant is recoverable at the granularity of a single file: a
/// failed load leaves already-loaded records untouched.
#[derive(Debug, Error)]
pub enum ChatError {
    /// File I/O error
    #[error("Error reading file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON
    #[error("Invalid JSON: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON does not match any supported export shape
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Every date entry was missing or unparseable
    #[error("No dated items found in the uploaded file")]
    NoDatedItems,

    /// No record with this id is loaded
    #[error("No chat loaded with id {0}")]
    UnknownChat(ChatId),

    /// The view configuration could not be read
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<serde_json::Error> for ChatError {
    fn from(source: serde_json::Error) -> Self {
        ChatError::Json {
            message: source.to_string(),
            source,
        }
    }
}

/// Ingestion format errors for a recognized file that has the wrong shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Group/DM export without a `messages` array
    #[error("Invalid JSON format: missing or invalid messages array")]
    MissingMessages,

    /// Conversation view expected a top-level array
    #[error("Invalid JSON format: expected a conversations array")]
    ExpectedConversations,

    /// Array items carry neither OpenAI nor Claude timestamps
    #[error("Unrecognized conversations format")]
    UnrecognizedConversations,

    /// Top level is neither an object nor an array
    #[error("Unrecognized export format: expected an object or an array")]
    UnrecognizedShape,
}

/// Result type for chat loading operations.
pub type ChatResult<T> = Result<T, ChatError>;
