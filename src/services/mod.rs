//! Application services layer - use cases and business logic.
//!
//! Services orchestrate the domain and the repositories behind the Unit of
//! Work. Each is exposed as a trait so handlers can be tested with mocks.

mod audit_service;
mod auth_service;
pub mod cascade;
mod catalog_service;
mod category_service;
pub mod container;
mod product_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use container::{ServiceContainer, Services};

pub use audit_service::{AuditLog, AuditService};
pub use auth_service::{AuthService, Authenticator, Claims, Principal, TokenResponse};
pub use cascade::cascade_delete_products;
pub use catalog_service::{Catalog, CatalogQuery, CatalogService, CategoryDetail, PopularProduct};
pub use category_service::{CategoryDeletion, CategoryInput, CategoryManager, CategoryService};
pub use product_service::{ProductManager, ProductService};
pub use user_service::{NewUser, UserManager, UserService, UserUpdate};

#[cfg(any(test, feature = "test-utils"))]
pub use audit_service::MockAuditService;
#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_service::MockCatalogService;
#[cfg(any(test, feature = "test-utils"))]
pub use category_service::MockCategoryService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use product_service::MockProductService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
