//! Request and response bodies for the proxy endpoints

use serde::{Deserialize, Serialize};

/// Successful session creation; `threadId` is read for older proxies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    #[serde(alias = "threadId")]
    pub session_id: String,
}

/// Session creation as answered on the thread-named route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadCreated {
    pub thread_id: String,
}

/// Body of a message send.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a validation error by the proxy rather than a parse failure.
/// `threadId` is accepted for widgets built against the thread-named API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    #[serde(default, alias = "threadId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MessageRequest {
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            message: Some(message.into()),
        }
    }
}

/// Assistant reply, with the session the turn landed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReply {
    pub message: String,
    #[serde(alias = "threadId")]
    pub session_id: String,
}

/// Stable, non-sensitive failure description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
