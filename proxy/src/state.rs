//! Proxy state shared by every request handler

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::core::{ConversationService, RateLimiter};
use crate::types::RateLimits;

/// Handler state; cheap to clone
pub struct AppState<A, S> {
    pub conversation: Arc<ConversationService<A, S>>,
    pub rate_limiter: Arc<RateLimiter>,
    pub rate_limits: RateLimits,
    pub max_message_chars: usize,
    /// Parent of every per-request cancellation token
    pub shutdown: CancellationToken,
    pub started_at: Instant,
}

// Manual impl: the derive would require A: Clone and S: Clone
impl<A, S> Clone for AppState<A, S> {
    fn clone(&self) -> Self {
        Self {
            conversation: self.conversation.clone(),
            rate_limiter: self.rate_limiter.clone(),
            rate_limits: self.rate_limits,
            max_message_chars: self.max_message_chars,
            shutdown: self.shutdown.clone(),
            started_at: self.started_at,
        }
    }
}

impl<A, S> AppState<A, S> {
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
