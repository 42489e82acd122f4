//! Public storefront handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::DEFAULT_POPULAR_LIMIT;
use crate::domain::{
    CategoryResponse, InteractionKind, PopularityWeights, ProductResponse, ProductSort, StockStatus,
};
use crate::errors::{AppError, AppResult};
use crate::services::{CatalogQuery, CategoryDetail, PopularProduct};
use crate::types::{Paginated, PaginationParams};

/// Storefront listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProductQuery {
    /// Case-insensitive match on title, SKU or description
    pub q: Option<String>,
    /// Category slug or id
    pub category: Option<String>,
    /// `EN STOCK`, `SIN STOCK`, `A PEDIDO` or `BAJO STOCK`
    pub stock: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    #[param(value_type = Option<String>)]
    pub sort: Option<ProductSort>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl ProductQuery {
    fn into_catalog_query(self) -> AppResult<CatalogQuery> {
        let stock_status = self
            .stock
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                StockStatus::parse(s)
                    .ok_or_else(|| AppError::BadRequest(format!("Estado de stock desconocido: {}", s)))
            })
            .transpose()?;

        let defaults = PaginationParams::default();
        Ok(CatalogQuery {
            search: self.q,
            category: self.category,
            stock_status,
            min_price: parse_price(self.min_price.as_deref())?,
            max_price: parse_price(self.max_price.as_deref())?,
            sort: self.sort.unwrap_or_default(),
            pagination: PaginationParams::new(
                self.page.unwrap_or(defaults.page),
                self.per_page.unwrap_or(defaults.per_page),
            ),
        })
    }
}

fn parse_price(raw: Option<&str>) -> AppResult<Option<Decimal>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Decimal::from_str(s)
                .map_err(|_| AppError::BadRequest(format!("Precio inválido: {}", s)))
        })
        .transpose()
}

/// Popular products query
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PopularQuery {
    pub limit: Option<u64>,
    /// Weight of a view (default 1)
    pub w_views: Option<u64>,
    /// Weight of a click (default 2)
    pub w_clicks: Option<u64>,
    /// Weight of a favorite (default 3)
    pub w_favorites: Option<u64>,
}

impl PopularQuery {
    fn weights(&self) -> PopularityWeights {
        let defaults = PopularityWeights::default();
        PopularityWeights::new(
            self.w_views.unwrap_or(defaults.views),
            self.w_clicks.unwrap_or(defaults.clicks),
            self.w_favorites.unwrap_or(defaults.favorites),
        )
    }
}

/// Storefront interaction
#[derive(Debug, Deserialize, ToSchema)]
pub struct InteractionRequest {
    pub kind: InteractionKind,
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/:slug", get(get_category))
        .route("/products", get(list_products))
        .route("/products/popular", get(popular_products))
        .route("/products/:id", get(get_product))
        .route("/products/:id/interactions", post(record_interaction))
}

/// Active category tree in display order
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Catalog",
    responses((status = 200, description = "Category tree", body = [CategoryResponse]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    Ok(Json(state.services.catalog().categories().await?))
}

/// One category with its published products
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    tag = "Catalog",
    params(("slug" = String, Path, description = "Category slug or id"), PaginationParams),
    responses(
        (status = 200, description = "Category detail", body = CategoryDetail),
        (status = 404, description = "Unknown or inactive category")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<CategoryDetail>> {
    let detail = state
        .services
        .catalog()
        .category_by_slug(&slug, pagination)
        .await?;
    Ok(Json(detail))
}

/// Published products with filters
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    params(ProductQuery),
    responses(
        (status = 200, description = "Page of products"),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Paginated<ProductResponse>>> {
    let page = state
        .services
        .catalog()
        .products(query.into_catalog_query()?)
        .await?;
    Ok(Json(page))
}

/// Most popular published products over the last 30 days
#[utoipa::path(
    get,
    path = "/api/products/popular",
    tag = "Catalog",
    params(PopularQuery),
    responses((status = 200, description = "Ranked products", body = [PopularProduct]))
)]
pub async fn popular_products(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> AppResult<Json<Vec<PopularProduct>>> {
    let ranked = state
        .services
        .catalog()
        .popular(query.limit.unwrap_or(DEFAULT_POPULAR_LIMIT), query.weights())
        .await?;
    Ok(Json(ranked))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Unknown or unpublished product")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductResponse>> {
    Ok(Json(state.services.catalog().product(id).await?))
}

/// Record a view, click or favorite
#[utoipa::path(
    post,
    path = "/api/products/{id}/interactions",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = InteractionRequest,
    responses(
        (status = 204, description = "Recorded"),
        (status = 404, description = "Unknown or unpublished product")
    )
)]
pub async fn record_interaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InteractionRequest>,
) -> AppResult<StatusCode> {
    state
        .services
        .catalog()
        .record_interaction(id, payload.kind)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_conversion() {
        let query = ProductQuery {
            stock: Some("en_stock".to_string()),
            min_price: Some("1000".to_string()),
            page: Some(2),
            ..ProductQuery::default()
        };
        let catalog = query.into_catalog_query().unwrap();
        assert_eq!(catalog.stock_status, Some(StockStatus::InStock));
        assert_eq!(catalog.min_price, Some(Decimal::from(1000)));
        assert_eq!(catalog.pagination.page(), 2);
        assert_eq!(catalog.sort, ProductSort::Recent);
    }

    #[test]
    fn test_bad_filters_rejected() {
        let query = ProductQuery {
            stock: Some("agotado".to_string()),
            ..ProductQuery::default()
        };
        assert!(matches!(query.into_catalog_query(), Err(AppError::BadRequest(_))));

        let query = ProductQuery {
            max_price: Some("mucho".to_string()),
            ..ProductQuery::default()
        };
        assert!(matches!(query.into_catalog_query(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_popular_weights_default() {
        let weights = PopularQuery::default().weights();
        assert_eq!(weights, PopularityWeights::default());
    }
}
