//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Table names are the storefront's Spanish schema names.

pub mod audit;
pub mod category;
pub mod error_fallback;
pub mod product;
pub mod product_interaction;
pub mod profile;
