//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion. Messages shown to users are
//! Spanish; internal detail is logged and never returned by release builds.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// A single field validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid payload")]
    InvalidPayload(Vec<FieldError>),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    /// A cascade delete stopped at a product that could not be removed
    #[error("Cascade delete failed at product {product_id} after {deleted} deletions: {reason}")]
    CascadeFailed {
        product_id: Uuid,
        deleted: usize,
        reason: String,
    },

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

/// Internal detail of a 5xx response, attached as a response extension so the
/// telemetry middleware can report it without leaking it to the client.
#[derive(Debug, Clone)]
pub struct ReportedError {
    pub message: String,
    pub critical: bool,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidPayload(_) => "INVALID_PAYLOAD",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::CascadeFailed { .. } => "CASCADE_FAILED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Cache(_) => "CACHE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::InvalidPayload(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::CascadeFailed { .. }
            | AppError::Database(_)
            | AppError::Cache(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Debes iniciar sesión para continuar".to_string(),
            AppError::Forbidden => "No tienes permisos para realizar esta acción".to_string(),
            AppError::InvalidCredentials => "Correo o contraseña incorrectos".to_string(),
            AppError::NotFound => "El recurso solicitado no existe".to_string(),
            AppError::Conflict(what) => format!("{} ya existe", what),
            AppError::Validation(msg) => msg.clone(),
            AppError::InvalidPayload(_) => "Los datos enviados no son válidos".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::CascadeFailed { product_id, .. } => {
                tracing::error!(error = %self, "Cascade delete failed");
                format!(
                    "No se pudo eliminar el producto {}; la categoría no fue eliminada",
                    product_id
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                detail_or_generic(&e.to_string())
            }
            AppError::Jwt(e) => {
                tracing::warn!("JWT error: {:?}", e);
                "Sesión inválida o expirada".to_string()
            }
            AppError::Cache(msg) => {
                tracing::error!("Cache error: {}", msg);
                detail_or_generic(msg)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                detail_or_generic(msg)
            }
        }
    }

    /// Internal description for telemetry (never sent to the client)
    pub fn internal_detail(&self) -> String {
        match self {
            AppError::Database(e) => format!("database: {}", e),
            AppError::Cache(msg) => format!("cache: {}", msg),
            AppError::Internal(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Generic Spanish message for unexpected failures
pub const GENERIC_ERROR_MESSAGE: &str = "Ocurrió un error inesperado. Intenta nuevamente.";

/// Debug builds show internal detail; release builds never do.
fn detail_or_generic(detail: &str) -> String {
    if cfg!(debug_assertions) {
        format!("{} ({})", GENERIC_ERROR_MESSAGE, detail)
    } else {
        GENERIC_ERROR_MESSAGE.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            AppError::InvalidPayload(errors) => Some(errors.clone()),
            _ => None,
        };
        let body = ErrorResponse {
            success: false,
            error: self.user_message(),
            code: self.code(),
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if status.is_server_error() {
            response.extensions_mut().insert(ReportedError {
                message: self.internal_detail(),
                critical: false,
            });
        }
        response
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
