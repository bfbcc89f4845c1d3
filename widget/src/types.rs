//! Type definitions for the widget runtime
//!
//! The widget is a pure state machine: [`Event`]s come in, a new
//! [`WidgetState`] and a list of [`Effect`]s come out. Effects are the only
//! place I/O happens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Theme, Turn};
use std::fmt;
use std::str::FromStr;

/// Prefix of session handles synthesized when the proxy is unreachable
pub const LOCAL_SESSION_PREFIX: &str = "local_";

/// Reply shown in place of the assistant's when a send fails
pub const APOLOGY_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// Lifecycle phase of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    /// Waiting for the proxy to hand out a session
    SessionPending,
    Idle,
    /// One message in flight
    Sending,
}

/// Everything the widget renders
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetState {
    pub phase: Phase,
    pub is_open: bool,
    pub theme: Theme,
    pub session_id: Option<String>,
    pub turns: Vec<Turn>,
    /// Dismissible banner text
    pub error: Option<String>,
}

impl WidgetState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// Input is accepted only with a session and nothing in flight
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle && self.session_id.is_some()
    }

    pub fn is_sending(&self) -> bool {
        self.phase == Phase::Sending
    }

    pub fn has_local_session(&self) -> bool {
        self.session_id
            .as_deref()
            .is_some_and(|id| id.starts_with(LOCAL_SESSION_PREFIX))
    }
}

/// Conversation export layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{other}' (expected text or json)")),
        }
    }
}

/// Snapshot of a conversation taken for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub widget_title: String,
    pub session_id: String,
    pub exported_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
    #[serde(skip)]
    pub format: ExportFormat,
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Widget attached to the page; storage has already been read
    Mounted {
        cached_session: Option<String>,
        restored_turns: Vec<Turn>,
    },
    SessionCreated(String),
    /// Session creation failed; carries banner text
    SessionFailed(String),
    Submit(String),
    ReplyReceived { text: String, session_id: String },
    /// Send failed; carries banner text
    ReplyFailed(String),
    DismissError,
    ToggleTheme,
    ToggleWindow,
    ExportRequested(ExportFormat),
    /// Export save or forward failed; carries banner text
    ExportFailed(String),
    /// Forget the current conversation and start a new one
    ResetSession,
}

/// Side effects requested by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateSession,
    SendMessage { session_id: String, message: String },
    PersistSession(String),
    PersistTurns { session_id: String, turns: Vec<Turn> },
    ClearStoredSession { session_id: Option<String> },
    SaveExport(ExportDocument),
    ForwardExport { url: String, document: ExportDocument },
}
