//! Caching: Redis when configured, an in-process TTL slot otherwise.
//!
//! The only cached aggregate is the public category tree. Cache failures are
//! logged and treated as misses; the database stays the source of truth.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::config::{CACHE_KEY_CATEGORIES, CACHE_PREFIX_RATE_LIMIT, CATEGORY_CACHE_TTL_SECONDS};
use crate::domain::CategoryResponse;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Redis cache wrapper with a managed, auto-reconnecting connection.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis cache connected");
        Ok(Self { connection })
    }

    /// Get the connection manager for direct Redis operations.
    pub fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json)
                    .map_err(|e| AppError::Cache(format!("deserialization: {}", e)))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with a TTL in seconds.
    pub async fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::Cache(format!("serialization: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    /// Delete a value from cache.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await.map_err(cache_error)?;
        Ok(())
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    /// Fixed-window counter. Returns `(count, allowed, seconds_until_reset)`.
    ///
    /// INCR and EXPIRE run in one MULTI so the first hit always gets a TTL.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool, u64)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let (count, ttl): (i64, i64) = redis::pipe()
            .atomic()
            .incr(&key, 1)
            .cmd("EXPIRE")
            .arg(&key)
            .arg(window_seconds)
            .arg("NX")
            .ignore()
            .ttl(&key)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        let count = count.max(0) as u64;
        let reset = if ttl > 0 { ttl as u64 } else { window_seconds };
        Ok((count, count <= max_requests, reset))
    }
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::Cache(e.to_string())
}

// =============================================================================
// Category tree cache
// =============================================================================

/// Cache for the public category tree.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogCache: Send + Sync {
    async fn get_categories(&self) -> Option<Vec<CategoryResponse>>;
    async fn set_categories(&self, tree: Vec<CategoryResponse>);
    async fn invalidate_categories(&self);
}

#[async_trait]
impl CatalogCache for Cache {
    async fn get_categories(&self) -> Option<Vec<CategoryResponse>> {
        match self.get(CACHE_KEY_CATEGORIES).await {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!(error = %e, "Category cache read failed");
                None
            }
        }
    }

    async fn set_categories(&self, tree: Vec<CategoryResponse>) {
        if let Err(e) = self
            .set_with_ttl(CACHE_KEY_CATEGORIES, &tree, CATEGORY_CACHE_TTL_SECONDS)
            .await
        {
            tracing::warn!(error = %e, "Category cache write failed");
        }
    }

    async fn invalidate_categories(&self) {
        if let Err(e) = self.delete(CACHE_KEY_CATEGORIES).await {
            tracing::warn!(error = %e, "Category cache invalidation failed");
        }
    }
}

/// In-process cache used when Redis is not configured.
pub struct LocalCache {
    ttl: Duration,
    slot: RwLock<Option<(Instant, Vec<CategoryResponse>)>>,
}

impl LocalCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(CATEGORY_CACHE_TTL_SECONDS))
    }
}

#[async_trait]
impl CatalogCache for LocalCache {
    async fn get_categories(&self) -> Option<Vec<CategoryResponse>> {
        let slot = self.slot.read().ok()?;
        match slot.as_ref() {
            Some((stored_at, tree)) if stored_at.elapsed() < self.ttl => Some(tree.clone()),
            _ => None,
        }
    }

    async fn set_categories(&self, tree: Vec<CategoryResponse>) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some((Instant::now(), tree));
        }
    }

    async fn invalidate_categories(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }
}
