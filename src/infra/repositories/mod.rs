//! Repository layer - Data access abstraction
//!
//! One trait per aggregate, implemented by a SeaORM `*Store`. Queries that
//! must also run inside a transaction are free functions generic over the
//! connection, shared with the transactional repositories.

mod audit_repository;
mod category_repository;
pub(crate) mod entities;
mod error_fallback_repository;
mod interaction_repository;
mod product_repository;
mod profile_repository;

pub use audit_repository::{AuditRepository, AuditStore};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use error_fallback_repository::{ErrorFallbackRepository, ErrorFallbackStore};
pub use interaction_repository::{InteractionRepository, InteractionStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use profile_repository::{ProfileRepository, ProfileStore};

pub(crate) mod shared {
    pub(crate) use super::audit_repository::append as append_audit;
    pub(crate) use super::category_repository::{
        delete as delete_category, find_by_id as find_category,
    };
    pub(crate) use super::product_repository::{
        delete as delete_product, find_title as find_product_title,
        ids_by_category as product_ids_by_category,
    };
}

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use audit_repository::MockAuditRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use error_fallback_repository::MockErrorFallbackRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use interaction_repository::MockInteractionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::MockProfileRepository;
