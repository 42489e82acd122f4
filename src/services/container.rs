//! Service container - centralized service access.
//!
//! Handlers reach every use case through `ServiceContainer`, so tests can
//! swap in mock services without a database.

use std::sync::Arc;

use super::{
    AuditLog, AuditService, AuthService, Authenticator, Catalog, CatalogService,
    CategoryManager, CategoryService, ProductManager, ProductService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{CatalogCache, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Public storefront
    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn categories(&self) -> Arc<dyn CategoryService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn audit(&self) -> Arc<dyn AuditService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    catalog_service: Arc<dyn CatalogService>,
    category_service: Arc<dyn CategoryService>,
    product_service: Arc<dyn ProductService>,
    user_service: Arc<dyn UserService>,
    audit_service: Arc<dyn AuditService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        catalog_service: Arc<dyn CatalogService>,
        category_service: Arc<dyn CategoryService>,
        product_service: Arc<dyn ProductService>,
        user_service: Arc<dyn UserService>,
        audit_service: Arc<dyn AuditService>,
    ) -> Self {
        Self {
            auth_service,
            catalog_service,
            category_service,
            product_service,
            user_service,
            audit_service,
        }
    }

    /// Wire every service over one Unit of Work
    pub fn from_persistence(
        uow: Arc<Persistence>,
        cache: Arc<dyn CatalogCache>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            catalog_service: Arc::new(Catalog::new(uow.clone(), cache.clone())),
            category_service: Arc::new(CategoryManager::new(uow.clone(), cache)),
            product_service: Arc::new(ProductManager::new(uow.clone())),
            user_service: Arc::new(UserManager::new(uow.clone())),
            audit_service: Arc::new(AuditLog::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn audit(&self) -> Arc<dyn AuditService> {
        self.audit_service.clone()
    }
}
