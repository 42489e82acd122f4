//! Product repository: admin CRUD and the public catalog search.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use serde::Serialize;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{Product, ProductDraft, ProductFilter, ProductSort, StockStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;
    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>>;
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>>;
    /// Filtered page of products plus the total match count
    async fn search(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;
    async fn ids_by_category(&self, category_id: Uuid) -> AppResult<Vec<Uuid>>;
    async fn count_by_category(&self, category_id: Uuid) -> AppResult<u64>;
    async fn create(&self, draft: ProductDraft) -> AppResult<Product>;
    async fn update(&self, id: Uuid, draft: ProductDraft) -> AppResult<Product>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed product repository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Product::from))
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let result = ProductEntity::find()
            .filter(product::Column::Sku.eq(sku))
            .one(&self.db)
            .await?;
        Ok(result.map(Product::from))
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ProductEntity::find()
            .filter(product::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn search(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let paginator = filtered_query(&filter).paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(pagination.page() - 1).await?;
        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn ids_by_category(&self, category_id: Uuid) -> AppResult<Vec<Uuid>> {
        ids_by_category(&self.db, category_id).await
    }

    async fn count_by_category(&self, category_id: Uuid) -> AppResult<u64> {
        let count = ProductEntity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn create(&self, draft: ProductDraft) -> AppResult<Product> {
        let now = Utc::now();
        let mut active = ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            ..Default::default()
        };
        apply_draft(&mut active, draft)?;
        active.updated_at = Set(now);

        let model = active.insert(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, draft: ProductDraft) -> AppResult<Product> {
        let model = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        apply_draft(&mut active, draft)?;
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete(&self.db, id).await
    }
}

/// Listing query with every filter applied and the requested order.
fn filtered_query(filter: &ProductFilter) -> Select<ProductEntity> {
    let mut query = ProductEntity::find();

    if filter.published_only {
        query = query.filter(product::Column::Published.eq(true));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        query = query.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(product::Column::Title))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(product::Column::Sku))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(product::Column::Description))).like(pattern)),
        );
    }
    if !filter.category_ids.is_empty() {
        query = query.filter(product::Column::CategoryId.is_in(filter.category_ids.clone()));
    }
    if let Some(status) = filter.stock_status {
        query = query.filter(product::Column::StockStatus.eq(status.as_str()));
    }
    if let Some(min) = filter.min_price {
        query = query.filter(product::Column::Price.gte(min));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(product::Column::Price.lte(max));
    }

    let ordered = match filter.sort {
        ProductSort::Recent => query.order_by_desc(product::Column::CreatedAt),
        ProductSort::PriceAsc => query.order_by_asc(product::Column::Price),
        ProductSort::PriceDesc => query.order_by_desc(product::Column::Price),
        ProductSort::Title => query.order_by_asc(product::Column::Title),
    };
    ordered.order_by_asc(product::Column::Id)
}

/// Escape LIKE wildcards in user input.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn to_json<T: Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Product serialization failed: {}", e)))
}

fn apply_draft(active: &mut ActiveModel, draft: ProductDraft) -> AppResult<()> {
    active.sku = Set(draft.sku);
    active.title = Set(draft.title);
    active.category_id = Set(draft.category_id);
    active.price = Set(draft.price);
    active.unit = Set(draft.unit);
    active.stock_status = Set(draft
        .stock_status
        .unwrap_or(StockStatus::InStock)
        .as_str()
        .to_string());
    active.description = Set(draft.description);
    active.specs = Set(to_json(&draft.specs)?);
    active.technical_specs = Set(to_json(&draft.technical_specs)?);
    active.images = Set(to_json(&draft.images)?);
    active.published = Set(draft.published);
    active.price_visible = Set(draft.price_visible);
    active.dimensions = Set(draft.dimensions.as_ref().map(to_json).transpose()?);
    active.weight_kg = Set(draft.weight_kg);
    active.quick_specs = Set(to_json(&draft.quick_specs)?);
    active.resources = Set(to_json(&draft.resources)?);
    Ok(())
}

pub(crate) async fn ids_by_category<C: ConnectionTrait>(
    db: &C,
    category_id: Uuid,
) -> AppResult<Vec<Uuid>> {
    let ids = ProductEntity::find()
        .select_only()
        .column(product::Column::Id)
        .filter(product::Column::CategoryId.eq(category_id))
        .order_by_asc(product::Column::CreatedAt)
        .into_tuple::<Uuid>()
        .all(db)
        .await?;
    Ok(ids)
}

pub(crate) async fn find_title<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<String>> {
    let title = ProductEntity::find_by_id(id)
        .select_only()
        .column(product::Column::Title)
        .into_tuple::<String>()
        .one(db)
        .await?;
    Ok(title)
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = ProductEntity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
