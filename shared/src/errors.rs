//! Shared error types for the assistant widget system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid base64 in widget config: {message}")]
    InvalidEncoding { message: String },

    #[error("Widget config is not valid UTF-8 after decoding")]
    InvalidUtf8,

    #[error("Deserialization failed: {message}")]
    DeserializationError { message: String },

    #[error("Serialization failed: {message}")]
    SerializationError { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
