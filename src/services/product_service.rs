//! Product administration - CRUD with audit trail.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Actor, AdminProductResponse, AuditAction, NewAuditRecord, ProductDraft, ProductFilter,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const TABLE_PRODUCTS: &str = "productos";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Products including unpublished ones
    async fn list(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<AdminProductResponse>>;

    async fn get(&self, id: Uuid) -> AppResult<AdminProductResponse>;

    async fn create(&self, draft: ProductDraft, actor: Actor) -> AppResult<AdminProductResponse>;

    async fn update(
        &self,
        id: Uuid,
        draft: ProductDraft,
        actor: Actor,
    ) -> AppResult<AdminProductResponse>;

    async fn delete(&self, id: Uuid, actor: Actor) -> AppResult<()>;
}

pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn validate(&self, id: Option<Uuid>, mut draft: ProductDraft) -> AppResult<ProductDraft> {
        draft.sku = draft.sku.trim().to_uppercase();
        draft.title = draft.title.trim().to_string();
        draft.unit = draft.unit.trim().to_string();

        if draft.sku.is_empty() {
            return Err(AppError::validation("El SKU es obligatorio"));
        }
        if draft.title.is_empty() {
            return Err(AppError::validation("El título del producto es obligatorio"));
        }
        if draft.price < Decimal::ZERO {
            return Err(AppError::validation("El precio no puede ser negativo"));
        }
        if draft.weight_kg.is_some_and(|w| w < Decimal::ZERO) {
            return Err(AppError::validation("El peso no puede ser negativo"));
        }
        if draft.unit.is_empty() {
            draft.unit = "unidad".to_string();
        }

        if self
            .uow
            .categories()
            .find_by_id(draft.category_id)
            .await?
            .is_none()
        {
            return Err(AppError::validation("La categoría indicada no existe"));
        }
        if let Some(existing) = self.uow.products().find_by_sku(&draft.sku).await? {
            if Some(existing.id) != id {
                return Err(AppError::conflict("Un producto con ese SKU"));
            }
        }

        Ok(draft)
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn list(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<AdminProductResponse>> {
        let filter = ProductFilter {
            published_only: false,
            ..filter
        };
        let (products, total) = self.uow.products().search(filter, pagination.clone()).await?;
        let data = products.into_iter().map(AdminProductResponse::from).collect();
        Ok(Paginated::from_params(data, &pagination, total))
    }

    async fn get(&self, id: Uuid) -> AppResult<AdminProductResponse> {
        let product = self.uow.products().find_by_id(id).await?.ok_or_not_found()?;
        Ok(AdminProductResponse::from(product))
    }

    async fn create(&self, draft: ProductDraft, actor: Actor) -> AppResult<AdminProductResponse> {
        let draft = self.validate(None, draft).await?;
        let product = self.uow.products().create(draft).await?;

        self.uow
            .audit()
            .append(NewAuditRecord::new(
                AuditAction::Create,
                TABLE_PRODUCTS,
                product.id,
                format!("Producto creado: {}", product.title),
                &actor,
            ))
            .await?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(AdminProductResponse::from(product))
    }

    async fn update(
        &self,
        id: Uuid,
        draft: ProductDraft,
        actor: Actor,
    ) -> AppResult<AdminProductResponse> {
        self.uow.products().find_by_id(id).await?.ok_or_not_found()?;
        let draft = self.validate(Some(id), draft).await?;
        let product = self.uow.products().update(id, draft).await?;

        self.uow
            .audit()
            .append(NewAuditRecord::new(
                AuditAction::Update,
                TABLE_PRODUCTS,
                id,
                format!("Producto actualizado: {}", product.title),
                &actor,
            ))
            .await?;

        Ok(AdminProductResponse::from(product))
    }

    async fn delete(&self, id: Uuid, actor: Actor) -> AppResult<()> {
        let product = self.uow.products().find_by_id(id).await?.ok_or_not_found()?;
        self.uow.products().delete(id).await?;

        self.uow
            .audit()
            .append(NewAuditRecord::new(
                AuditAction::Delete,
                TABLE_PRODUCTS,
                id,
                format!("Producto eliminado: {}", product.title),
                &actor,
            ))
            .await?;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{
        category, product, product_from_draft, stored_audit, TestUnitOfWork,
    };

    fn draft(category_id: Uuid) -> ProductDraft {
        ProductDraft {
            sku: " cem-pol-25 ".to_string(),
            title: "Cemento Polpaico 25 kg".to_string(),
            category_id,
            price: Decimal::from(5490),
            price_visible: true,
            ..ProductDraft::default()
        }
    }

    fn actor() -> Actor {
        Actor::new(Some(Uuid::new_v4()), "bodega@example.cl")
    }

    #[tokio::test]
    async fn test_create_normalizes_and_audits() {
        let obra_gruesa = category("Obra Gruesa");
        let category_id = obra_gruesa.id;

        let mut uow = TestUnitOfWork::default();
        uow.categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(obra_gruesa.clone())));
        uow.products
            .expect_find_by_sku()
            .withf(|sku| sku == "CEM-POL-25")
            .returning(|_| Ok(None));
        uow.products
            .expect_create()
            .withf(|draft| draft.sku == "CEM-POL-25" && draft.unit == "unidad")
            .returning(|draft| Ok(product_from_draft(Uuid::new_v4(), draft)));
        uow.audit
            .expect_append()
            .withf(|record| {
                record.table_name == "productos"
                    && record.description == "Producto creado: Cemento Polpaico 25 kg"
            })
            .times(1)
            .returning(|record| Ok(stored_audit(record)));

        let service = ProductManager::new(uow.build());
        let created = service.create(draft(category_id), actor()).await.unwrap();
        assert_eq!(created.product.sku, "CEM-POL-25");
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let mut uow = TestUnitOfWork::default();
        uow.products.expect_create().never();
        let service = ProductManager::new(uow.build());

        let mut bad = draft(Uuid::new_v4());
        bad.price = Decimal::from(-1);
        assert!(matches!(
            service.create(bad, actor()).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let mut uow = TestUnitOfWork::default();
        uow.categories.expect_find_by_id().returning(|_| Ok(None));
        uow.products.expect_create().never();
        let service = ProductManager::new(uow.build());

        assert!(matches!(
            service.create(draft(Uuid::new_v4()), actor()).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_sku_conflict_on_update_of_other_product() {
        let obra_gruesa = category("Obra Gruesa");
        let category_id = obra_gruesa.id;
        let other = product(category_id, "CEM-POL-25", true);
        let target = product(category_id, "CEM-MEL-25", true);
        let target_id = target.id;

        let mut uow = TestUnitOfWork::default();
        uow.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(target.clone())));
        uow.categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(obra_gruesa.clone())));
        uow.products
            .expect_find_by_sku()
            .returning(move |_| Ok(Some(other.clone())));
        uow.products.expect_update().never();

        let service = ProductManager::new(uow.build());
        assert!(matches!(
            service.update(target_id, draft(category_id), actor()).await,
            Err(AppError::Conflict(_))
        ));
    }
}
