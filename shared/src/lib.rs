//! Shared types for the assistant widget and its proxy
//!
//! Contains the wire contract between the embedded widget and the proxy
//! (request/response bodies, conversation turns), the widget configuration
//! with its query-parameter codec, and component-aware tracing setup.

pub mod types;
pub mod errors;
pub mod messages;
pub mod config;
pub mod logging;

pub use types::*;
pub use errors::*;

// Re-export the HTTP contract used by both sides
pub use messages::{ErrorBody, MessageReply, MessageRequest, SessionCreated, ThreadCreated};

pub use config::{Theme, WidgetConfig};
