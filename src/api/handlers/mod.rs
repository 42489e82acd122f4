//! HTTP request handlers.

pub mod admin_category_handler;
pub mod admin_product_handler;
pub mod admin_user_handler;
pub mod auth_handler;
pub mod catalog_handler;
pub mod debug_handler;
pub mod history_handler;
pub mod telemetry_handler;

pub use admin_category_handler::admin_category_routes;
pub use admin_product_handler::admin_product_routes;
pub use admin_user_handler::admin_user_routes;
pub use auth_handler::auth_routes;
pub use catalog_handler::catalog_routes;
pub use debug_handler::debug_routes;
pub use history_handler::history_routes;
pub use telemetry_handler::telemetry_routes;
