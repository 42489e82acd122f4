//! Back-office profile repository (`perfiles`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::profile::{self, ActiveModel, Entity as ProfileEntity};
use crate::domain::{AdminUser, NewProfile, ProfileChanges};
use crate::errors::{AppError, AppResult};

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a profile that has not been deleted
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AdminUser>>;
    /// Find by e-mail, case-insensitively, excluding deleted profiles
    async fn find_by_email(&self, email: &str) -> AppResult<Option<AdminUser>>;
    /// Whether any profile, deleted ones included, uses this e-mail
    async fn email_taken(&self, email: &str) -> AppResult<bool>;
    /// Every profile that has not been deleted, oldest first
    async fn list(&self) -> AppResult<Vec<AdminUser>>;
    async fn create(&self, profile: NewProfile) -> AppResult<AdminUser>;
    async fn update(&self, id: Uuid, changes: ProfileChanges) -> AppResult<AdminUser>;
    async fn set_banned_until(
        &self,
        id: Uuid,
        banned_until: Option<DateTime<Utc>>,
    ) -> AppResult<AdminUser>;
    async fn soft_delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed profile repository
pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_live_model(&self, id: Uuid) -> AppResult<profile::Model> {
        ProfileEntity::find_by_id(id)
            .filter(profile::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AdminUser>> {
        let result = ProfileEntity::find_by_id(id)
            .filter(profile::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(result.map(AdminUser::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<AdminUser>> {
        let result = ProfileEntity::find()
            .filter(profile::Column::Email.eq(email.trim().to_lowercase()))
            .filter(profile::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(result.map(AdminUser::from))
    }

    async fn email_taken(&self, email: &str) -> AppResult<bool> {
        let count = ProfileEntity::find()
            .filter(profile::Column::Email.eq(email.trim().to_lowercase()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self) -> AppResult<Vec<AdminUser>> {
        let models = ProfileEntity::find()
            .filter(profile::Column::DeletedAt.is_null())
            .order_by_asc(profile::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(AdminUser::from).collect())
    }

    async fn create(&self, new_profile: NewProfile) -> AppResult<AdminUser> {
        let now = Utc::now();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_profile.email.trim().to_lowercase()),
            password_hash: Set(new_profile.password_hash),
            display_name: Set(new_profile.display_name),
            role: Set(new_profile.role.to_string()),
            banned_until: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&self.db).await?;
        Ok(AdminUser::from(model))
    }

    async fn update(&self, id: Uuid, changes: ProfileChanges) -> AppResult<AdminUser> {
        let model = self.find_live_model(id).await?;
        let mut active: ActiveModel = model.into();

        if let Some(display_name) = changes.display_name {
            active.display_name = Set(display_name);
        }
        if let Some(role) = changes.role {
            active.role = Set(role.to_string());
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(AdminUser::from(model))
    }

    async fn set_banned_until(
        &self,
        id: Uuid,
        banned_until: Option<DateTime<Utc>>,
    ) -> AppResult<AdminUser> {
        let model = self.find_live_model(id).await?;
        let mut active: ActiveModel = model.into();
        active.banned_until = Set(banned_until);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(AdminUser::from(model))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let model = self.find_live_model(id).await?;
        let mut active: ActiveModel = model.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }
}
