//! Category repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use crate::domain::{Category, CategoryDraft};
use crate::errors::{AppError, AppResult};

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>>;
    /// All categories, optionally including inactive ones
    async fn list(&self, include_inactive: bool) -> AppResult<Vec<Category>>;
    async fn create(&self, draft: CategoryDraft) -> AppResult<Category>;
    async fn update(&self, id: Uuid, draft: CategoryDraft) -> AppResult<Category>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed category repository
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(result.map(Category::from))
    }

    async fn list(&self, include_inactive: bool) -> AppResult<Vec<Category>> {
        let mut query = CategoryEntity::find().order_by_asc(category::Column::Name);
        if !include_inactive {
            query = query.filter(category::Column::Active.eq(true));
        }
        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn create(&self, draft: CategoryDraft) -> AppResult<Category> {
        let now = Utc::now();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(draft.name),
            slug: Set(draft.slug),
            description: Set(draft.description),
            active: Set(draft.active),
            parent_id: Set(draft.parent_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn update(&self, id: Uuid, draft: CategoryDraft) -> AppResult<Category> {
        let model = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.name = Set(draft.name);
        active.slug = Set(draft.slug);
        active.description = Set(draft.description);
        active.active = Set(draft.active);
        active.parent_id = Set(draft.parent_id);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete(&self.db, id).await
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Category>> {
    let result = CategoryEntity::find_by_id(id).one(db).await?;
    Ok(result.map(Category::from))
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = CategoryEntity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
