//! Obra Catalog - storefront and back office for a construction-materials
//! catalog.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Catalog entities, category ordering, popularity scoring
//! - **services**: Use cases (catalog, admin CRUD, accounts, audit, auth)
//! - **telemetry**: Error redaction, fingerprinting, reporting and ingest
//! - **infra**: Database, Redis, repositories and rate limiting
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! obra-catalog serve
//!
//! # Run migrations
//! obra-catalog migrate up
//!
//! # Bootstrap the first admin
//! obra-catalog admin create --email jefe@example.cl --password '...' --name 'Jefe'
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod telemetry;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
