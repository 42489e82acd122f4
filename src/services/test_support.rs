//! Unit of Work over repository mocks for service tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AuditRecord, Category, NewAuditRecord, Product, ProductDraft, StockStatus};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    AuditRepository, CategoryRepository, ErrorFallbackRepository, InteractionRepository,
    MockAuditRepository, MockCategoryRepository, MockErrorFallbackRepository,
    MockInteractionRepository, MockProductRepository, MockProfileRepository, ProductRepository,
    ProfileRepository, TransactionContext, TxFuture, UnitOfWork,
};

#[derive(Default)]
pub(crate) struct TestUnitOfWork {
    pub categories: MockCategoryRepository,
    pub products: MockProductRepository,
    pub profiles: MockProfileRepository,
    pub audit: MockAuditRepository,
    pub interactions: MockInteractionRepository,
}

impl TestUnitOfWork {
    pub fn build(self) -> Arc<BuiltUnitOfWork> {
        Arc::new(BuiltUnitOfWork {
            categories: Arc::new(self.categories),
            products: Arc::new(self.products),
            profiles: Arc::new(self.profiles),
            audit: Arc::new(self.audit),
            interactions: Arc::new(self.interactions),
            error_fallback: Arc::new(MockErrorFallbackRepository::new()),
        })
    }
}

pub(crate) struct BuiltUnitOfWork {
    categories: Arc<MockCategoryRepository>,
    products: Arc<MockProductRepository>,
    profiles: Arc<MockProfileRepository>,
    audit: Arc<MockAuditRepository>,
    interactions: Arc<MockInteractionRepository>,
    error_fallback: Arc<MockErrorFallbackRepository>,
}

#[async_trait]
impl UnitOfWork for BuiltUnitOfWork {
    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    fn audit(&self) -> Arc<dyn AuditRepository> {
        self.audit.clone()
    }

    fn interactions(&self) -> Arc<dyn InteractionRepository> {
        self.interactions.clone()
    }

    fn error_fallback(&self) -> Arc<dyn ErrorFallbackRepository> {
        self.error_fallback.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub(crate) fn category(name: &str) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: crate::domain::slugify(name),
        description: None,
        active: true,
        parent_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn product(category_id: Uuid, sku: &str, published: bool) -> Product {
    Product {
        id: Uuid::new_v4(),
        sku: sku.to_string(),
        title: format!("Producto {}", sku),
        category_id,
        price: 1000.into(),
        unit: "unidad".to_string(),
        stock_status: StockStatus::InStock,
        description: None,
        specs: Default::default(),
        technical_specs: Default::default(),
        images: vec![],
        published,
        price_visible: true,
        dimensions: None,
        weight_kg: None,
        quick_specs: vec![],
        resources: vec![],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn product_from_draft(id: Uuid, draft: ProductDraft) -> Product {
    Product {
        id,
        sku: draft.sku,
        title: draft.title,
        category_id: draft.category_id,
        price: draft.price,
        unit: draft.unit,
        stock_status: draft.stock_status.unwrap_or(StockStatus::InStock),
        description: draft.description,
        specs: draft.specs,
        technical_specs: draft.technical_specs,
        images: draft.images,
        published: draft.published,
        price_visible: draft.price_visible,
        dimensions: draft.dimensions,
        weight_kg: draft.weight_kg,
        quick_specs: draft.quick_specs,
        resources: draft.resources,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn stored_audit(record: NewAuditRecord) -> AuditRecord {
    AuditRecord {
        id: 1,
        action: record.action,
        table_name: record.table_name,
        record_id: record.record_id,
        description: record.description,
        actor_id: record.actor_id,
        actor_email: record.actor_email,
        created_at: Utc::now(),
    }
}
