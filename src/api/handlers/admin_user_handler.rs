//! Back-office account handlers (admin only).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{AdminUserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::services::{NewUser, UserUpdate};
use crate::types::MessageResponse;

/// Account creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email(message = "El correo no es válido"))]
    #[schema(example = "bodega@example.cl")]
    pub email: String,
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"))]
    #[schema(example = "Hormigon2024!")]
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "El nombre es obligatorio"))]
    #[schema(example = "María Pérez")]
    pub display_name: String,
    pub role: UserRole,
}

/// Partial account update, addressed by `id`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"))]
    pub password: Option<String>,
    /// `false` disables the account, `true` lifts the ban
    pub enabled: Option<bool>,
}

impl UpdateUserRequest {
    fn has_profile_changes(&self) -> bool {
        self.display_name.is_some() || self.role.is_some() || self.password.is_some()
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteUserQuery {
    pub id: Uuid,
}

pub fn admin_user_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_users)
            .post(create_user)
            .patch(update_user)
            .delete(delete_user),
    )
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accounts", body = [AdminUserResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AdminUserResponse>>> {
    Ok(Json(state.services.users().list_users().await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = AdminUserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<AdminUserResponse>)> {
    let created = state
        .services
        .users()
        .create_user(
            NewUser {
                email: payload.email,
                password: payload.password,
                display_name: payload.display_name,
                role: payload.role,
            },
            user.actor,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update profile fields and/or enable or disable the account
#[utoipa::path(
    patch,
    path = "/api/admin/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = AdminUserResponse),
        (status = 400, description = "Nothing to update, or disabling your own account"),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<AdminUserResponse>> {
    if !payload.has_profile_changes() && payload.enabled.is_none() {
        return Err(AppError::validation("No hay cambios para aplicar"));
    }

    let users = state.services.users();
    let mut updated = None;

    if payload.has_profile_changes() {
        let update = UserUpdate {
            display_name: payload.display_name,
            role: payload.role,
            password: payload.password,
        };
        updated = Some(
            users
                .update_user(payload.id, update, user.actor.clone())
                .await?,
        );
    }
    if let Some(enabled) = payload.enabled {
        updated = Some(users.set_enabled(payload.id, enabled, user.actor).await?);
    }

    updated
        .map(Json)
        .ok_or_else(|| AppError::validation("No hay cambios para aplicar"))
}

/// Soft delete an account
#[utoipa::path(
    delete,
    path = "/api/admin/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(DeleteUserQuery),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Deleting your own account"),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<DeleteUserQuery>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .users()
        .delete_user(query.id, user.actor)
        .await?;
    Ok(Json(MessageResponse::new("Usuario eliminado")))
}
