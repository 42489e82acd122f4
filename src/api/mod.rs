//! API layer - HTTP handlers and middleware
//!
//! - Storefront, back-office and telemetry handlers
//! - Middleware (authentication, rate limiting, error reporting)
//! - Custom extractors
//! - Route definitions

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
