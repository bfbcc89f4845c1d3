//! Widget error types
//!
//! None of these reach the visitor verbatim; the state machine turns them
//! into an apology turn and a short banner.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("Proxy returned HTTP {status}: {message}")]
    Proxy { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from proxy: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WidgetResult<T> = Result<T, WidgetError>;

impl WidgetError {
    pub fn storage(message: impl Into<String>) -> Self {
        WidgetError::Storage { message: message.into() }
    }

    pub fn export(message: impl Into<String>) -> Self {
        WidgetError::Export { message: message.into() }
    }

    /// Short text for the error banner
    pub fn banner(&self) -> &'static str {
        match self {
            WidgetError::Proxy { status: 429, .. } => "Too many messages. Please wait a moment.",
            WidgetError::Proxy { status: 504, .. } => "The assistant is taking too long. Please try again.",
            WidgetError::Proxy { .. } | WidgetError::InvalidResponse(_) => "The assistant is unavailable right now.",
            WidgetError::Network(_) => "Unable to reach the assistant.",
            WidgetError::Storage { .. } => "Conversation could not be saved.",
            WidgetError::Export { .. } | WidgetError::Serialization(_) | WidgetError::Io(_) => {
                "Conversation could not be exported."
            }
        }
    }
}
