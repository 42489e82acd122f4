//! Application state - dependency injection container.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, CATEGORY_CACHE_TTL_SECONDS};
use crate::infra::{
    Cache, CatalogCache, Database, InMemoryRateLimiter, LocalCache, Persistence, RateLimiter,
    RedisRateLimiter, UnitOfWork,
};
use crate::services::{ServiceContainer, Services};
use crate::telemetry::{ErrorIngestService, ErrorReporter, HttpTrackingSink};

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Fallback error ingest behind `/api/log-error`
    pub ingest: Arc<ErrorIngestService>,
    /// Server-side error capture
    pub reporter: Arc<ErrorReporter>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub config: Arc<Config>,
    /// None in router tests
    pub database: Option<Arc<Database>>,
    /// None when REDIS_URL is not configured
    pub cache: Option<Arc<Cache>>,
}

impl AppState {
    /// Wire the production graph.
    ///
    /// With Redis the category cache and the rate limits are shared across
    /// replicas; without it both stay per process.
    pub fn from_config(database: Arc<Database>, cache: Option<Arc<Cache>>, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(database.connection().clone()));

        let (catalog_cache, rate_limiter): (Arc<dyn CatalogCache>, Arc<dyn RateLimiter>) =
            match &cache {
                Some(cache) => (
                    cache.clone() as Arc<dyn CatalogCache>,
                    Arc::new(RedisRateLimiter::new(cache.clone())),
                ),
                None => (
                    Arc::new(LocalCache::new(Duration::from_secs(CATEGORY_CACHE_TTL_SECONDS))),
                    Arc::new(InMemoryRateLimiter::new()),
                ),
            };

        let ingest = Arc::new(ErrorIngestService::new(
            uow.error_fallback(),
            rate_limiter.clone(),
            &config,
        ));
        let reporter = Arc::new(ErrorReporter::new(
            Arc::new(HttpTrackingSink::from_config(&config)),
            ingest.clone(),
            &config,
        ));
        let services = Arc::new(Services::from_persistence(uow, catalog_cache, config.clone()));

        Self {
            services,
            ingest,
            reporter,
            rate_limiter,
            config: Arc::new(config),
            database: Some(database),
            cache,
        }
    }

    /// State with injected services and no external infrastructure.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        ingest: Arc<ErrorIngestService>,
        reporter: Arc<ErrorReporter>,
        rate_limiter: Arc<dyn RateLimiter>,
        config: Config,
    ) -> Self {
        Self {
            services,
            ingest,
            reporter,
            rate_limiter,
            config: Arc::new(config),
            database: None,
            cache: None,
        }
    }
}
