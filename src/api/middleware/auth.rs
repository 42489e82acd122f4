//! Bearer authentication and role gates for the admin area.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{Actor, UserRole};
use crate::errors::AppError;
use crate::services::Principal;

/// Authenticated back-office caller, stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub actor: Actor,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Principal> for CurrentUser {
    fn from(principal: Principal) -> Self {
        Self {
            actor: principal.actor,
            role: principal.role,
        }
    }
}

/// Token after the `Bearer ` prefix, if any.
pub fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the bearer token and inject the CurrentUser.
///
/// Missing or invalid tokens are 401; disabled accounts are 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;
    let principal = state.services.auth().authenticate(token).await?;

    request.extensions_mut().insert(CurrentUser::from(principal));
    Ok(next.run(request).await)
}

fn current_user(request: &Request) -> Result<&CurrentUser, AppError> {
    request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)
}

/// Gate for user management and audit history.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    if !current_user(&request)?.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Gate for category and product administration.
pub async fn require_catalog_editor(request: Request, next: Next) -> Result<Response, AppError> {
    if !current_user(&request)?.role.can_edit_catalog() {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
