//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Redis cache and the in-process fallback
//! - Rate limiters
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod rate_limit;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, CatalogCache, LocalCache};
pub use db::{Database, Migrator};
pub use rate_limit::{InMemoryRateLimiter, RateDecision, RateLimiter, RedisRateLimiter};
pub use repositories::{
    AuditRepository, AuditStore, CategoryRepository, CategoryStore, ErrorFallbackRepository,
    ErrorFallbackStore, InteractionRepository, InteractionStore, ProductRepository, ProductStore,
    ProfileRepository, ProfileStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxAuditRepository, TxCategoryRepository, TxFuture,
    TxProductRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockCatalogCache;
#[cfg(any(test, feature = "test-utils"))]
pub use rate_limit::MockRateLimiter;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAuditRepository, MockCategoryRepository, MockErrorFallbackRepository,
    MockInteractionRepository, MockProductRepository, MockProfileRepository,
};
