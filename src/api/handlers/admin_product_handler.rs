//! Product administration handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    AdminProductResponse, Dimensions, ProductDraft, ProductFilter, ProductResource, ProductSort,
    QuickSpec, StockStatus,
};
use crate::errors::{AppError, AppResult};
use crate::types::{MessageResponse, Paginated, PaginationParams};

fn default_true() -> bool {
    true
}

/// Product create/replace request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 64, message = "El SKU es obligatorio (máximo 64 caracteres)"))]
    #[schema(example = "CEM-POL-25")]
    pub sku: String,
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio (máximo 200 caracteres)"))]
    #[schema(example = "Cemento Polpaico 25 kg")]
    pub title: String,
    pub category_id: Uuid,
    #[schema(value_type = String, example = "5490")]
    pub price: Decimal,
    #[validate(length(max = 40))]
    #[schema(example = "saco")]
    pub unit: Option<String>,
    pub stock_status: Option<StockStatus>,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    #[serde(default)]
    pub technical_specs: BTreeMap<String, String>,
    #[serde(default)]
    #[validate(length(max = 30, message = "Máximo 30 imágenes"))]
    pub images: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default = "default_true")]
    pub price_visible: bool,
    pub dimensions: Option<Dimensions>,
    #[schema(value_type = Option<String>)]
    pub weight_kg: Option<Decimal>,
    #[serde(default)]
    pub quick_specs: Vec<QuickSpec>,
    #[serde(default)]
    pub resources: Vec<ProductResource>,
}

impl From<ProductRequest> for ProductDraft {
    fn from(request: ProductRequest) -> Self {
        Self {
            sku: request.sku,
            title: request.title,
            category_id: request.category_id,
            price: request.price,
            unit: request.unit.unwrap_or_default(),
            stock_status: request.stock_status,
            description: request.description,
            specs: request.specs,
            technical_specs: request.technical_specs,
            images: request.images,
            published: request.published,
            price_visible: request.price_visible,
            dimensions: request.dimensions,
            weight_kg: request.weight_kg,
            quick_specs: request.quick_specs,
            resources: request.resources,
        }
    }
}

/// Admin listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AdminProductQuery {
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
    pub stock: Option<String>,
    #[param(value_type = Option<String>)]
    pub sort: Option<ProductSort>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl AdminProductQuery {
    fn into_parts(self) -> AppResult<(ProductFilter, PaginationParams)> {
        let stock_status = match self.stock.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(StockStatus::parse(raw).ok_or_else(|| {
                AppError::BadRequest(format!("Estado de stock desconocido: {}", raw))
            })?),
            None => None,
        };
        let filter = ProductFilter {
            search: self.q,
            category_ids: self.category_id.into_iter().collect(),
            stock_status,
            sort: self.sort.unwrap_or_default(),
            ..ProductFilter::default()
        };
        let defaults = PaginationParams::default();
        let pagination = PaginationParams::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        );
        Ok((filter, pagination))
    }
}

pub fn admin_product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Products including unpublished ones
#[utoipa::path(
    get,
    path = "/api/admin/products",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(AdminProductQuery),
    responses(
        (status = 200, description = "Page of products"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Insufficient role")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<AdminProductQuery>,
) -> AppResult<Json<Paginated<AdminProductResponse>>> {
    let (filter, pagination) = query.into_parts()?;
    let page = state.services.products().list(filter, pagination).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = AdminProductResponse),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AdminProductResponse>> {
    Ok(Json(state.services.products().get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Created", body = AdminProductResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "SKU already in use")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<(StatusCode, Json<AdminProductResponse>)> {
    let product = state
        .services
        .products()
        .create(payload.into(), user.actor)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated", body = AdminProductResponse),
        (status = 404, description = "Unknown product"),
        (status = 409, description = "SKU already in use")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Json<AdminProductResponse>> {
    let product = state
        .services
        .products()
        .update(id, payload.into(), user.actor)
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.services.products().delete(id, user.actor).await?;
    Ok(Json(MessageResponse::new("Producto eliminado")))
}
