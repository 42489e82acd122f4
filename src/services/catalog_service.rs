//! Public storefront catalog: category tree, product listings and popularity.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{MAX_PAGE_SIZE, POPULARITY_WINDOW_DAYS};
use crate::domain::{
    build_category_tree, rank_by_popularity, sort_categories, Category, CategoryResponse,
    InteractionKind, PopularityWeights, Product, ProductFilter, ProductPopularity,
    ProductResponse, ProductSort, StockStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{CatalogCache, UnitOfWork};
use crate::types::{Paginated, PaginationMeta, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Storefront listing query
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    /// Category slug or id; subcategories are included
    pub category: Option<String>,
    pub stock_status: Option<StockStatus>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: ProductSort,
    pub pagination: PaginationParams,
}

/// One category with a page of its published products
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDetail {
    pub category: CategoryResponse,
    pub products: Vec<ProductResponse>,
    pub meta: PaginationMeta,
}

/// Product ranked by 30-day interactions
#[derive(Debug, Serialize, ToSchema)]
pub struct PopularProduct {
    pub product: ProductResponse,
    pub popularity: ProductPopularity,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Active category tree in display order
    async fn categories(&self) -> AppResult<Vec<CategoryResponse>>;

    async fn category_by_slug(
        &self,
        slug: &str,
        pagination: PaginationParams,
    ) -> AppResult<CategoryDetail>;

    async fn products(&self, query: CatalogQuery) -> AppResult<Paginated<ProductResponse>>;

    async fn product(&self, id: Uuid) -> AppResult<ProductResponse>;

    async fn record_interaction(&self, product_id: Uuid, kind: InteractionKind) -> AppResult<()>;

    async fn popular(&self, limit: u64, weights: PopularityWeights)
        -> AppResult<Vec<PopularProduct>>;
}

pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
    cache: Arc<dyn CatalogCache>,
}

impl<U: UnitOfWork> Catalog<U> {
    pub fn new(uow: Arc<U>, cache: Arc<dyn CatalogCache>) -> Self {
        Self { uow, cache }
    }

    /// Resolve an active category by id or slug.
    async fn resolve_category(&self, key: &str) -> AppResult<Category> {
        let key = key.trim();
        let category = match Uuid::parse_str(key) {
            Ok(id) => self.uow.categories().find_by_id(id).await?,
            Err(_) => self.uow.categories().find_by_slug(&key.to_lowercase()).await?,
        };
        category.filter(|c| c.active).ok_or_not_found()
    }

    async fn children(&self, parent_id: Uuid) -> AppResult<Vec<Category>> {
        Ok(self
            .uow
            .categories()
            .list(false)
            .await?
            .into_iter()
            .filter(|c| c.parent_id == Some(parent_id))
            .collect())
    }

    /// The category id followed by its active direct children.
    async fn category_scope(&self, category: &Category) -> AppResult<Vec<Uuid>> {
        let mut ids = vec![category.id];
        ids.extend(self.children(category.id).await?.iter().map(|c| c.id));
        Ok(ids)
    }

    async fn published(&self, id: Uuid) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .filter(|p| p.published)
            .ok_or_not_found()
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for Catalog<U> {
    async fn categories(&self) -> AppResult<Vec<CategoryResponse>> {
        if let Some(tree) = self.cache.get_categories().await {
            return Ok(tree);
        }

        let tree = build_category_tree(self.uow.categories().list(false).await?);
        self.cache.set_categories(tree.clone()).await;
        Ok(tree)
    }

    async fn category_by_slug(
        &self,
        slug: &str,
        pagination: PaginationParams,
    ) -> AppResult<CategoryDetail> {
        let category = self.resolve_category(slug).await?;
        let children = self.children(category.id).await?;
        let mut category_ids = vec![category.id];
        category_ids.extend(children.iter().map(|c| c.id));

        let mut node = CategoryResponse::from(category);
        node.subcategories = children.into_iter().map(CategoryResponse::from).collect();
        sort_categories(&mut node.subcategories);

        let filter = ProductFilter {
            category_ids,
            published_only: true,
            ..ProductFilter::default()
        };
        let (products, total) = self.uow.products().search(filter, pagination.clone()).await?;
        let page = Paginated::from_params(
            products.into_iter().map(ProductResponse::from).collect(),
            &pagination,
            total,
        );

        Ok(CategoryDetail {
            category: node,
            products: page.data,
            meta: page.meta,
        })
    }

    async fn products(&self, query: CatalogQuery) -> AppResult<Paginated<ProductResponse>> {
        if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
            if min > max {
                return Err(AppError::validation("El precio mínimo supera al máximo"));
            }
        }

        let category_ids = match query.category.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(key) => {
                let category = self.resolve_category(key).await?;
                self.category_scope(&category).await?
            }
            None => Vec::new(),
        };

        let filter = ProductFilter {
            search: query.search,
            category_ids,
            stock_status: query.stock_status,
            min_price: query.min_price,
            max_price: query.max_price,
            published_only: true,
            sort: query.sort,
        };
        let (products, total) = self
            .uow
            .products()
            .search(filter, query.pagination.clone())
            .await?;

        Ok(Paginated::from_params(
            products.into_iter().map(ProductResponse::from).collect(),
            &query.pagination,
            total,
        ))
    }

    async fn product(&self, id: Uuid) -> AppResult<ProductResponse> {
        Ok(ProductResponse::from(self.published(id).await?))
    }

    async fn record_interaction(&self, product_id: Uuid, kind: InteractionKind) -> AppResult<()> {
        self.published(product_id).await?;
        self.uow.interactions().record(product_id, kind).await?;
        tracing::debug!(%product_id, kind = kind.as_str(), "Interaction recorded");
        Ok(())
    }

    async fn popular(
        &self,
        limit: u64,
        weights: PopularityWeights,
    ) -> AppResult<Vec<PopularProduct>> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE) as usize;
        let since = Utc::now() - Duration::days(POPULARITY_WINDOW_DAYS);
        let stats = self.uow.interactions().stats_since(since).await?;

        let ranked = rank_by_popularity(stats, &weights);
        let ids: Vec<Uuid> = ranked.iter().map(|r| r.product_id).collect();
        let mut products: HashMap<Uuid, Product> = self
            .uow
            .products()
            .find_many(ids)
            .await?
            .into_iter()
            .filter(|p| p.published)
            .map(|p| (p.id, p))
            .collect();

        Ok(ranked
            .into_iter()
            .filter_map(|popularity| {
                products
                    .remove(&popularity.product_id)
                    .map(|product| PopularProduct {
                        product: ProductResponse::from(product),
                        popularity,
                    })
            })
            .take(limit)
            .collect())
    }
}
