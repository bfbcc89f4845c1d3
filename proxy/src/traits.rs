//! Service trait definitions for dependency injection
//!
//! All I/O and time is abstracted through these traits so the conversation
//! protocol, the poll loop and the rate limiter can be tested without a
//! network or a wall clock.

use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::error::UpstreamResult;
use crate::types::{AssistantCredentials, Run, ThreadMessage};

/// Assistant provider (threads, messages and runs)
#[mockall::automock]
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create an empty conversation thread and return its id
    async fn create_thread(&self) -> UpstreamResult<String>;

    /// Append a user message to a thread
    async fn add_user_message(&self, thread_id: &str, content: &str) -> UpstreamResult<()>;

    /// Start a run of the configured assistant against a thread
    async fn create_run(&self, thread_id: &str) -> UpstreamResult<Run>;

    /// Fetch the current state of a run
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> UpstreamResult<Run>;

    /// Fetch the newest message in a thread
    async fn latest_message(&self, thread_id: &str) -> UpstreamResult<Option<ThreadMessage>>;
}

/// Suspends the poll loop between attempts
#[mockall::automock]
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Monotonic time source for rate-limit windows
#[mockall::automock]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Credential loading for the assistant provider
#[mockall::automock]
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Load provider credentials, naming every missing variable on failure
    async fn load(&self) -> Result<AssistantCredentials, MissingCredentials>;
}

/// Names of required credential variables that were not set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCredentials {
    pub keys: Vec<String>,
}

impl std::fmt::Display for MissingCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing required credentials: {}", self.keys.join(", "))
    }
}

impl std::error::Error for MissingCredentials {}
