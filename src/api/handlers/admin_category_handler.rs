//! Category administration handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::CategoryResponse;
use crate::errors::AppResult;
use crate::services::{CategoryDeletion, CategoryInput};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 120, message = "El nombre es obligatorio (máximo 120 caracteres)"))]
    #[schema(example = "Obra Gruesa")]
    pub name: String,
    /// Derived from the name when omitted
    #[validate(length(max = 140))]
    #[schema(example = "obra-gruesa")]
    pub slug: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub active: Option<bool>,
    pub parent_id: Option<Uuid>,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(request: CategoryRequest) -> Self {
        Self {
            name: request.name,
            slug: request.slug,
            description: request.description,
            active: request.active,
            parent_id: request.parent_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DeleteCategoryQuery {
    /// Also delete every product in the category
    #[serde(default)]
    pub cascade: bool,
}

pub fn admin_category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
}

/// All categories, inactive included
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Categories", body = [CategoryResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Insufficient role")
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    Ok(Json(state.services.categories().list().await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Created", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    let category = state
        .services
        .categories()
        .create(payload.into(), user.actor)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated", body = CategoryResponse),
        (status = 404, description = "Unknown category"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state
        .services
        .categories()
        .update(id, payload.into(), user.actor)
        .await?;
    Ok(Json(category))
}

/// Delete a category; `cascade=true` removes its products first
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category id"), DeleteCategoryQuery),
    responses(
        (status = 200, description = "Deleted", body = CategoryDeletion),
        (status = 400, description = "Category still has products"),
        (status = 404, description = "Unknown category"),
        (status = 500, description = "Cascade stopped at a product; nothing was deleted")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteCategoryQuery>,
) -> AppResult<Json<CategoryDeletion>> {
    let deletion = state
        .services
        .categories()
        .delete(id, query.cascade, user.actor)
        .await?;
    Ok(Json(deletion))
}
