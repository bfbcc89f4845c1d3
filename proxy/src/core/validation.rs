//! Message request validation
//!
//! Runs before any upstream call. Session ids end up in upstream URL paths,
//! so only the characters the provider issues are accepted.

use shared::MessageRequest;

use crate::error::{ProxyError, ProxyResult};
use crate::types::ValidatedMessage;

/// Default cap on the trimmed message length, in characters
pub const MAX_MESSAGE_CHARS: usize = 4000;

const MAX_SESSION_ID_LEN: usize = 128;

fn is_valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id.len() <= MAX_SESSION_ID_LEN
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Check presence, emptiness and length; returns the trimmed message
pub fn validate_message_request(request: MessageRequest, max_chars: usize) -> ProxyResult<ValidatedMessage> {
    let (session_id, message) = match (request.session_id, request.message) {
        (Some(session_id), Some(message)) if !session_id.trim().is_empty() => (session_id, message),
        _ => return Err(ProxyError::validation("Missing sessionId or message")),
    };

    let session_id = session_id.trim().to_string();
    if !is_valid_session_id(&session_id) {
        return Err(ProxyError::validation("Invalid sessionId"));
    }

    let message = message.trim();
    if message.is_empty() {
        return Err(ProxyError::validation("Message cannot be empty"));
    }

    if message.chars().count() > max_chars {
        return Err(ProxyError::validation(format!(
            "Message is too long (maximum {max_chars} characters)"
        )));
    }

    Ok(ValidatedMessage {
        session_id,
        message: message.to_string(),
    })
}
