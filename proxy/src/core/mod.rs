//! Core business logic modules
//!
//! Conversation protocol, poll state machine, validation and rate limiting.
//! No direct I/O: everything goes through the service traits.

pub mod conversation;
pub mod rate_limiter;
pub mod run_poller;
pub mod validation;

// Re-export commonly used types
pub use conversation::{ConversationService, extract_assistant_text};
pub use rate_limiter::{RateLimitRecord, RateLimiter};
pub use run_poller::{PollState, RunPoller, advance};
pub use validation::{MAX_MESSAGE_CHARS, validate_message_request};
