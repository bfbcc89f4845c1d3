//! Tests for the rate limit sweeper task

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::RateLimiter;
use crate::services::{ManualClock, spawn_rate_limit_sweeper};

#[tokio::test]
async fn test_sweeper_removes_expired_records() {
    let clock = ManualClock::new();
    let limiter = Arc::new(RateLimiter::new(Arc::new(clock.clone())));
    limiter.allow("messages:10.0.0.1", 30, Duration::from_secs(60));
    limiter.allow("sessions:10.0.0.1", 100, Duration::from_secs(600));

    let shutdown = CancellationToken::new();
    let handle = spawn_rate_limit_sweeper(limiter.clone(), Duration::from_millis(10), shutdown.clone());

    clock.advance(Duration::from_secs(61));
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(limiter.len(), 1);
    assert!(limiter.record("sessions:10.0.0.1").is_some());

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_sweeper_stops_on_shutdown() {
    let limiter = Arc::new(RateLimiter::new(Arc::new(ManualClock::new())));
    let shutdown = CancellationToken::new();
    let handle = spawn_rate_limit_sweeper(limiter, Duration::from_secs(3600), shutdown.clone());

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("sweeper should stop promptly")
        .unwrap();
}
