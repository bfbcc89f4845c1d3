//! Periodic cleanup of expired rate-limit records

use std::sync::Arc;
use std::time::Duration;

use shared::{Component, component_debug, component_info};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::RateLimiter;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn a task that sweeps `limiter` every `interval` until `shutdown` fires
pub fn spawn_rate_limit_sweeper(
    limiter: Arc<RateLimiter>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    component_info!(Component::current(), "Rate limit sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = limiter.sweep();
                    if removed > 0 {
                        component_debug!(
                            Component::current(),
                            removed,
                            remaining = limiter.len(),
                            "Swept expired rate limit records"
                        );
                    }
                }
            }
        }
    })
}
