//! Domain layer - Core business entities and logic
//!
//! Catalog entities, the category display order, popularity scoring and
//! back-office accounts. Nothing here touches the database or HTTP.

pub mod audit;
pub mod category;
pub mod password;
pub mod popularity;
pub mod product;
pub mod user;

pub use audit::{Actor, AuditAction, AuditRecord, NewAuditRecord};
pub use category::{
    build_category_tree, category_rank, compare_category_names, normalize_category_name, slugify,
    sort_categories, Category, CategoryDraft, CategoryRank, CategoryResponse, NamedCategory, CATEGORY_PRIORITY,
};
pub use password::Password;
pub use popularity::{
    calculate_popularity_score, rank_by_popularity, PopularityStats, PopularityWeights,
    ProductPopularity,
};
pub use product::{
    AdminProductResponse, Dimensions, InteractionKind, Product, ProductDraft, ProductFilter,
    ProductResource, ProductResponse, ProductSort, QuickSpec, StockStatus,
};
pub use user::{
    AdminUser, AdminUserResponse, NewProfile, ProfileChanges, UserRole, UserStatus,
};
