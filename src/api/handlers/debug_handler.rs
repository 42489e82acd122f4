//! Failure triggers for exercising the error reporting path.
//!
//! Only mounted outside production.

use axum::{routing::get, Router};

use crate::api::AppState;
use crate::errors::{AppError, AppResult};

pub fn debug_routes() -> Router<AppState> {
    Router::new()
        .route("/error", get(debug_error))
        .route("/panic", get(debug_panic))
}

/// Returns a 500 that the error middleware reports
async fn debug_error() -> AppResult<()> {
    Err(AppError::internal("debug error endpoint"))
}

/// Panics; the panic layer turns it into a critical 500
async fn debug_panic() -> &'static str {
    panic!("debug panic endpoint")
}
