//! Category administration - CRUD with audit trail and cascade delete.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::cascade::cascade_delete_products;
use crate::domain::{
    slugify, sort_categories, Actor, AuditAction, Category, CategoryDraft, CategoryResponse,
    NewAuditRecord,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{CatalogCache, UnitOfWork};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const TABLE_CATEGORIES: &str = "categorias";
const TABLE_PRODUCTS: &str = "productos";

/// Category fields as submitted by an admin
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: String,
    /// Derived from the name when absent
    pub slug: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub parent_id: Option<Uuid>,
}

/// Result of a category deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryDeletion {
    pub category_id: Uuid,
    /// Products removed by the cascade
    pub deleted_products: usize,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Every category, inactive included, in display order
    async fn list(&self) -> AppResult<Vec<CategoryResponse>>;

    async fn create(&self, input: CategoryInput, actor: Actor) -> AppResult<CategoryResponse>;

    async fn update(
        &self,
        id: Uuid,
        input: CategoryInput,
        actor: Actor,
    ) -> AppResult<CategoryResponse>;

    /// Delete a category. Without `cascade` the category must be empty.
    async fn delete(&self, id: Uuid, cascade: bool, actor: Actor) -> AppResult<CategoryDeletion>;
}

pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: Arc<dyn CatalogCache>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>, cache: Arc<dyn CatalogCache>) -> Self {
        Self { uow, cache }
    }

    /// Validate input and resolve the slug, rejecting duplicates and bad parents.
    async fn prepare(
        &self,
        id: Option<Uuid>,
        input: CategoryInput,
        current: Option<&Category>,
    ) -> AppResult<CategoryDraft> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("El nombre de la categoría es obligatorio"));
        }

        let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => slugify(slug),
            None => slugify(&name),
        };
        if slug.is_empty() {
            return Err(AppError::validation("No se pudo generar un slug a partir del nombre"));
        }
        if let Some(existing) = self.uow.categories().find_by_slug(&slug).await? {
            if Some(existing.id) != id {
                return Err(AppError::conflict("Una categoría con ese slug"));
            }
        }

        if let Some(parent_id) = input.parent_id {
            if Some(parent_id) == id {
                return Err(AppError::validation("Una categoría no puede ser su propia categoría padre"));
            }
            if self.uow.categories().find_by_id(parent_id).await?.is_none() {
                return Err(AppError::validation("La categoría padre no existe"));
            }
        }

        Ok(CategoryDraft {
            name,
            slug,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            active: input
                .active
                .unwrap_or_else(|| current.map_or(true, |c| c.active)),
            parent_id: input.parent_id,
        })
    }

    async fn audit(&self, record: NewAuditRecord) -> AppResult<()> {
        self.uow.audit().append(record).await?;
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn list(&self) -> AppResult<Vec<CategoryResponse>> {
        let mut categories: Vec<CategoryResponse> = self
            .uow
            .categories()
            .list(true)
            .await?
            .into_iter()
            .map(CategoryResponse::from)
            .collect();
        sort_categories(&mut categories);
        Ok(categories)
    }

    async fn create(&self, input: CategoryInput, actor: Actor) -> AppResult<CategoryResponse> {
        let draft = self.prepare(None, input, None).await?;
        let category = self.uow.categories().create(draft).await?;

        self.audit(NewAuditRecord::new(
            AuditAction::Create,
            TABLE_CATEGORIES,
            category.id,
            format!("Categoría creada: {}", category.name),
            &actor,
        ))
        .await?;
        self.cache.invalidate_categories().await;

        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(CategoryResponse::from(category))
    }

    async fn update(
        &self,
        id: Uuid,
        input: CategoryInput,
        actor: Actor,
    ) -> AppResult<CategoryResponse> {
        let current = self.uow.categories().find_by_id(id).await?.ok_or_not_found()?;
        let draft = self.prepare(Some(id), input, Some(&current)).await?;
        let category = self.uow.categories().update(id, draft).await?;

        self.audit(NewAuditRecord::new(
            AuditAction::Update,
            TABLE_CATEGORIES,
            id,
            format!("Categoría actualizada: {}", category.name),
            &actor,
        ))
        .await?;
        self.cache.invalidate_categories().await;

        Ok(CategoryResponse::from(category))
    }

    async fn delete(&self, id: Uuid, cascade: bool, actor: Actor) -> AppResult<CategoryDeletion> {
        let category = self.uow.categories().find_by_id(id).await?.ok_or_not_found()?;
        let product_count = self.uow.products().count_by_category(id).await?;

        if product_count > 0 && !cascade {
            return Err(AppError::validation(format!(
                "La categoría tiene {} productos asociados; usa cascade=true para eliminarlos",
                product_count
            )));
        }

        let description = format!("Categoría eliminada: {}", category.name);
        let deleted_products = if product_count == 0 {
            self.uow.categories().delete(id).await?;
            self.audit(NewAuditRecord::new(
                AuditAction::Delete,
                TABLE_CATEGORIES,
                id,
                description,
                &actor,
            ))
            .await?;
            0
        } else {
            with_transaction!(self.uow, |ctx| {
                let products = ctx.products();
                let audit = ctx.audit();
                let ids = products.ids_by_category(id).await?;

                let deleted = cascade_delete_products(&ids, |product_id| {
                    let products = &products;
                    let audit = &audit;
                    let actor = &actor;
                    async move {
                        let title = products.title(product_id).await?.unwrap_or_default();
                        products.delete(product_id).await?;
                        audit
                            .append(NewAuditRecord::new(
                                AuditAction::Delete,
                                TABLE_PRODUCTS,
                                product_id,
                                format!("Producto eliminado en cascada: {}", title),
                                actor,
                            ))
                            .await?;
                        Ok(())
                    }
                })
                .await?;

                ctx.categories().delete(id).await?;
                audit
                    .append(NewAuditRecord::new(
                        AuditAction::Delete,
                        TABLE_CATEGORIES,
                        id,
                        format!("{} ({} productos)", description, deleted),
                        &actor,
                    ))
                    .await?;
                Ok(deleted)
            })?
        };

        self.cache.invalidate_categories().await;
        tracing::info!(category_id = %id, deleted_products, "Category deleted");

        Ok(CategoryDeletion {
            category_id: id,
            deleted_products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockCatalogCache;
    use crate::services::test_support::{category, stored_audit, TestUnitOfWork};
    use mockall::predicate::eq;

    fn actor() -> Actor {
        Actor::new(Some(Uuid::new_v4()), "jefe@example.cl")
    }

    fn invalidating_cache() -> Arc<MockCatalogCache> {
        let mut cache = MockCatalogCache::new();
        cache.expect_invalidate_categories().returning(|| ());
        Arc::new(cache)
    }

    #[tokio::test]
    async fn test_delete_with_products_requires_cascade() {
        let existing = category("Obra Gruesa");
        let id = existing.id;

        let mut uow = TestUnitOfWork::default();
        uow.categories
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        uow.products
            .expect_count_by_category()
            .with(eq(id))
            .returning(|_| Ok(3));
        uow.categories.expect_delete().never();

        let service = CategoryManager::new(uow.build(), Arc::new(MockCatalogCache::new()));
        let result = service.delete(id, false, actor()).await;

        match result {
            Err(AppError::Validation(message)) => assert!(message.contains("3 productos")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_empty_category_is_audited() {
        let existing = category("Ferretería");
        let id = existing.id;

        let mut uow = TestUnitOfWork::default();
        uow.categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        uow.products.expect_count_by_category().returning(|_| Ok(0));
        uow.categories
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(()));
        uow.audit
            .expect_append()
            .withf(move |record| {
                record.action == AuditAction::Delete
                    && record.table_name == "categorias"
                    && record.record_id == id.to_string()
                    && record.description == "Categoría eliminada: Ferretería"
            })
            .times(1)
            .returning(|record| Ok(stored_audit(record)));

        let service = CategoryManager::new(uow.build(), invalidating_cache());
        let deletion = service.delete(id, true, actor()).await.unwrap();

        assert_eq!(deletion.category_id, id);
        assert_eq!(deletion.deleted_products, 0);
    }

    #[tokio::test]
    async fn test_cascade_surfaces_transaction_error() {
        let existing = category("Terminaciones");
        let id = existing.id;

        let mut uow = TestUnitOfWork::default();
        uow.categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        uow.products.expect_count_by_category().returning(|_| Ok(2));
        uow.categories.expect_delete().never();

        // The test unit of work refuses to open transactions
        let service = CategoryManager::new(uow.build(), Arc::new(MockCatalogCache::new()));
        let result = service.delete(id, true, actor()).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_category() {
        let mut uow = TestUnitOfWork::default();
        uow.categories.expect_find_by_id().returning(|_| Ok(None));

        let service = CategoryManager::new(uow.build(), Arc::new(MockCatalogCache::new()));
        let result = service.delete(Uuid::new_v4(), true, actor()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_audits() {
        let mut uow = TestUnitOfWork::default();
        uow.categories
            .expect_find_by_slug()
            .withf(|slug| slug == "eifs-envolvente-termico")
            .returning(|_| Ok(None));
        uow.categories
            .expect_create()
            .withf(|draft| draft.slug == "eifs-envolvente-termico" && draft.active)
            .returning(|draft| {
                let mut created = category(&draft.name);
                created.slug = draft.slug;
                Ok(created)
            });
        uow.audit
            .expect_append()
            .withf(|record| record.action == AuditAction::Create)
            .times(1)
            .returning(|record| Ok(stored_audit(record)));

        let service = CategoryManager::new(uow.build(), invalidating_cache());
        let input = CategoryInput {
            name: "  EIFS Envolvente Térmico ".to_string(),
            ..CategoryInput::default()
        };
        let created = service.create(input, actor()).await.unwrap();

        assert_eq!(created.name, "EIFS Envolvente Térmico");
        assert_eq!(created.slug, "eifs-envolvente-termico");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug() {
        let mut uow = TestUnitOfWork::default();
        uow.categories
            .expect_find_by_slug()
            .returning(|slug| Ok(Some(category(slug))));
        uow.categories.expect_create().never();

        let service = CategoryManager::new(uow.build(), Arc::new(MockCatalogCache::new()));
        let input = CategoryInput {
            name: "Seguridad".to_string(),
            ..CategoryInput::default()
        };

        assert!(matches!(
            service.create(input, actor()).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let service = CategoryManager::new(
            TestUnitOfWork::default().build(),
            Arc::new(MockCatalogCache::new()),
        );
        let input = CategoryInput {
            name: "   ".to_string(),
            ..CategoryInput::default()
        };

        assert!(matches!(
            service.create(input, actor()).await,
            Err(AppError::Validation(_))
        ));
    }
}
