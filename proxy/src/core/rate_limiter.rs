//! Fixed-window request counter keyed by client
//!
//! Pure in-memory state with an injected clock. The read-check-increment for
//! a key happens under a single lock, so two concurrent requests can never
//! both observe the same stale count. Counters are per process; a fleet of
//! proxies needs a shared store instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::traits::Clock;
use crate::types::RateBudget;

/// Counter state for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub count: u32,
    pub window_reset_at: Instant,
}

/// Shared rate limiter store
pub struct RateLimiter {
    records: Mutex<HashMap<String, RateLimitRecord>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, RateLimitRecord>> {
        // A panic while holding the lock cannot leave a record half-written
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a request for `key` and decide whether it may proceed
    pub fn allow(&self, key: &str, limit: u32, window: Duration) -> bool {
        let now = self.clock.now();
        let mut records = self.records();

        match records.get_mut(key) {
            None => {
                records.insert(
                    key.to_string(),
                    RateLimitRecord {
                        count: 1,
                        window_reset_at: now + window,
                    },
                );
                true
            }
            Some(record) if now > record.window_reset_at => {
                record.count = 1;
                record.window_reset_at = now + window;
                true
            }
            Some(record) => {
                record.count = record.count.saturating_add(1);
                record.count <= limit
            }
        }
    }

    /// [`allow`](Self::allow) with a route budget
    pub fn check(&self, key: &str, budget: RateBudget) -> bool {
        self.allow(key, budget.limit, budget.window)
    }

    /// Drop every record whose window has passed; returns how many were removed
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.records();
        let before = records.len();
        records.retain(|_, record| record.window_reset_at >= now);
        before - records.len()
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current record for a key
    pub fn record(&self, key: &str) -> Option<RateLimitRecord> {
        self.records().get(key).copied()
    }
}
