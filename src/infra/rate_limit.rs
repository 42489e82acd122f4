//! Fixed-window rate limiting, backed by Redis or process memory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::cache::Cache;
use crate::errors::{AppError, AppResult};

/// Entries kept before expired windows are swept
const SWEEP_THRESHOLD: usize = 10_000;

/// Outcome of one counted hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub count: u64,
    pub limit: u64,
    /// Seconds until the current window resets
    pub reset_after: u64,
}

impl RateDecision {
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.count)
    }
}

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count a hit against `key` and decide whether it is allowed.
    async fn hit(&self, key: &str, limit: u64, window: Duration) -> AppResult<RateDecision>;
}

#[derive(Debug)]
struct Window {
    count: u64,
    reset_at: Instant,
}

/// Per-process counters; the default when no Redis is configured.
#[derive(Debug, Default)]
pub struct InMemoryRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a hit at an explicit instant.
    pub fn hit_at(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
        now: Instant,
    ) -> AppResult<RateDecision> {
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| AppError::internal("rate limiter lock poisoned"))?;

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, w| w.reset_at > now);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + window,
        });
        if entry.reset_at <= now {
            entry.count = 0;
            entry.reset_at = now + window;
        }
        entry.count += 1;

        Ok(RateDecision {
            allowed: entry.count <= limit,
            count: entry.count,
            limit,
            reset_after: entry.reset_at.saturating_duration_since(now).as_secs(),
        })
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn hit(&self, key: &str, limit: u64, window: Duration) -> AppResult<RateDecision> {
        self.hit_at(key, limit, window, Instant::now())
    }
}

/// Shared counters in Redis, for multi-instance deployments.
#[derive(Clone)]
pub struct RedisRateLimiter {
    cache: Arc<Cache>,
}

impl RedisRateLimiter {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn hit(&self, key: &str, limit: u64, window: Duration) -> AppResult<RateDecision> {
        let (count, allowed, reset_after) = self
            .cache
            .check_rate_limit(key, limit, window.as_secs().max(1))
            .await?;
        Ok(RateDecision {
            allowed,
            count,
            limit,
            reset_after,
        })
    }
}
