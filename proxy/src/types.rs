//! Type definitions for the proxy
//!
//! Upstream assistant objects (runs, thread messages) and the request-level
//! values the handlers pass around.

use serde::{Deserialize, Serialize};
use shared::Role;
use std::fmt;
use std::time::Duration;

/// Prefix of session handles synthesized by the widget when it could not
/// reach the proxy at mount time
pub const LOCAL_SESSION_PREFIX: &str = "local_";

/// Lifecycle state of an assistant run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Still executing; keep polling
    pub fn is_pending(self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling)
    }

    pub fn is_completed(self) -> bool {
        self == RunStatus::Completed
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Error attached to a failed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// One execution of the assistant against a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl Run {
    pub fn new(id: impl Into<String>, status: RunStatus) -> Self {
        Self {
            id: id.into(),
            status,
            last_error: None,
        }
    }

    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.last_error = Some(RunError {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    /// Human readable failure detail for logs
    pub fn failure_detail(&self) -> String {
        match &self.last_error {
            Some(error) => error.to_string(),
            None => "no error detail".to_string(),
        }
    }
}

/// Text payload of a message content part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<serde_json::Value>,
}

/// Content part of a thread message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

impl MessageContent {
    pub fn text(value: impl Into<String>) -> Self {
        MessageContent::Text {
            text: TextContent {
                value: value.into(),
                annotations: Vec::new(),
            },
        }
    }
}

/// Message stored in an upstream thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    pub fn assistant_text(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: vec![MessageContent::text(value)],
        }
    }
}

/// Request ceiling for one route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBudget {
    pub limit: u32,
    pub window: Duration,
}

impl RateBudget {
    pub fn per_minute(limit: u32) -> Self {
        Self {
            limit,
            window: Duration::from_secs(60),
        }
    }
}

/// Budgets for both endpoints; sessions are cheap, messages are not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub sessions: RateBudget,
    pub messages: RateBudget,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            sessions: RateBudget::per_minute(100),
            messages: RateBudget::per_minute(30),
        }
    }
}

/// Run polling bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_attempts: 60,
        }
    }
}

/// Message request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMessage {
    pub session_id: String,
    pub message: String,
}

impl ValidatedMessage {
    /// Session handle synthesized client side, unknown upstream
    pub fn has_local_session(&self) -> bool {
        self.session_id.starts_with(LOCAL_SESSION_PREFIX)
    }
}

/// Credentials for the assistant provider
#[derive(Clone, PartialEq, Eq)]
pub struct AssistantCredentials {
    pub api_key: String,
    pub assistant_id: String,
}

impl fmt::Debug for AssistantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantCredentials")
            .field("api_key", &"<redacted>")
            .field("assistant_id", &self.assistant_id)
            .finish()
    }
}
