//! Back-office account management.
//!
//! Accounts are never removed: disabling sets a far-future ban and deleting
//! stamps `deleted_at`. Both are audited against the `perfiles` table.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DISABLED_BAN_DAYS;
use crate::domain::{
    Actor, AdminUserResponse, AuditAction, NewAuditRecord, NewProfile, Password, ProfileChanges,
    UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const TABLE_PROFILES: &str = "perfiles";

/// Account creation request
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: UserRole,
}

/// Partial account update; `None` fields are left as they are
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Accounts that have not been deleted
    async fn list_users(&self) -> AppResult<Vec<AdminUserResponse>>;

    async fn create_user(&self, user: NewUser, actor: Actor) -> AppResult<AdminUserResponse>;

    async fn update_user(
        &self,
        id: Uuid,
        update: UserUpdate,
        actor: Actor,
    ) -> AppResult<AdminUserResponse>;

    /// Lift or impose the ban that disables an account
    async fn set_enabled(
        &self,
        id: Uuid,
        enabled: bool,
        actor: Actor,
    ) -> AppResult<AdminUserResponse>;

    /// Soft delete
    async fn delete_user(&self, id: Uuid, actor: Actor) -> AppResult<()>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn audit(
        &self,
        action: AuditAction,
        id: Uuid,
        description: String,
        actor: &Actor,
    ) -> AppResult<()> {
        self.uow
            .audit()
            .append(NewAuditRecord::new(action, TABLE_PROFILES, id, description, actor))
            .await?;
        Ok(())
    }
}

fn non_empty_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("El nombre es obligatorio"));
    }
    Ok(name.to_string())
}

fn reject_self(id: Uuid, actor: &Actor, message: &str) -> AppResult<()> {
    if actor.id == Some(id) {
        return Err(AppError::validation(message));
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self) -> AppResult<Vec<AdminUserResponse>> {
        let users = self.uow.profiles().list().await?;
        Ok(users.into_iter().map(AdminUserResponse::from).collect())
    }

    async fn create_user(&self, user: NewUser, actor: Actor) -> AppResult<AdminUserResponse> {
        let email = user.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::validation("El correo es obligatorio"));
        }
        let display_name = non_empty_name(&user.display_name)?;
        if self.uow.profiles().email_taken(&email).await? {
            return Err(AppError::conflict("Un usuario con ese correo"));
        }
        let password = Password::new(&user.password)?;

        let created = self
            .uow
            .profiles()
            .create(NewProfile {
                email,
                password_hash: password.into_string(),
                display_name,
                role: user.role,
            })
            .await?;

        self.audit(
            AuditAction::Create,
            created.id,
            format!("Usuario creado: {} ({})", created.email, created.role),
            &actor,
        )
        .await?;

        tracing::info!(user_id = %created.id, role = %created.role, "Back-office user created");
        Ok(AdminUserResponse::from(created))
    }

    async fn update_user(
        &self,
        id: Uuid,
        update: UserUpdate,
        actor: Actor,
    ) -> AppResult<AdminUserResponse> {
        let current = self.uow.profiles().find_by_id(id).await?.ok_or_not_found()?;

        let changes = ProfileChanges {
            display_name: update.display_name.as_deref().map(non_empty_name).transpose()?,
            role: update.role,
            password_hash: update
                .password
                .as_deref()
                .map(|plain| Password::new(plain).map(Password::into_string))
                .transpose()?,
        };

        let mut changed = Vec::new();
        if changes.display_name.is_some() {
            changed.push("nombre");
        }
        if changes.role.is_some_and(|role| role != current.role) {
            changed.push("rol");
        }
        if changes.password_hash.is_some() {
            changed.push("contraseña");
        }

        let updated = self.uow.profiles().update(id, changes).await?;
        self.audit(
            AuditAction::Update,
            id,
            format!("Usuario actualizado: {} [{}]", updated.email, changed.join(", ")),
            &actor,
        )
        .await?;

        Ok(AdminUserResponse::from(updated))
    }

    async fn set_enabled(
        &self,
        id: Uuid,
        enabled: bool,
        actor: Actor,
    ) -> AppResult<AdminUserResponse> {
        if !enabled {
            reject_self(id, &actor, "No puedes deshabilitar tu propia cuenta")?;
        }
        self.uow.profiles().find_by_id(id).await?.ok_or_not_found()?;

        let banned_until = (!enabled).then(|| Utc::now() + Duration::days(DISABLED_BAN_DAYS));
        let updated = self.uow.profiles().set_banned_until(id, banned_until).await?;

        let verb = if enabled { "habilitado" } else { "deshabilitado" };
        self.audit(
            AuditAction::Update,
            id,
            format!("Usuario {}: {}", verb, updated.email),
            &actor,
        )
        .await?;

        tracing::info!(user_id = %id, enabled, "Back-office user status changed");
        Ok(AdminUserResponse::from(updated))
    }

    async fn delete_user(&self, id: Uuid, actor: Actor) -> AppResult<()> {
        reject_self(id, &actor, "No puedes eliminar tu propia cuenta")?;
        let user = self.uow.profiles().find_by_id(id).await?.ok_or_not_found()?;

        self.uow.profiles().soft_delete(id).await?;
        self.audit(
            AuditAction::Delete,
            id,
            format!("Usuario eliminado: {}", user.email),
            &actor,
        )
        .await?;

        tracing::info!(user_id = %id, "Back-office user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdminUser, UserStatus};
    use crate::services::test_support::{stored_audit, TestUnitOfWork};
    use mockall::predicate::eq;

    fn account(id: Uuid, email: &str) -> AdminUser {
        AdminUser {
            id,
            email: email.to_string(),
            password_hash: "hash".to_string(),
            display_name: "Bodega".to_string(),
            role: UserRole::Editor,
            banned_until: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_cannot_disable_or_delete_self() {
        let me = Uuid::new_v4();
        let actor = Actor::new(Some(me), "jefe@example.cl");
        let mut uow = TestUnitOfWork::default();
        uow.profiles.expect_set_banned_until().never();
        uow.profiles.expect_soft_delete().never();
        let service = UserManager::new(uow.build());

        assert!(matches!(
            service.set_enabled(me, false, actor.clone()).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.delete_user(me, actor).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_disable_sets_future_ban() {
        let id = Uuid::new_v4();
        let mut uow = TestUnitOfWork::default();
        uow.profiles
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |id| Ok(Some(account(id, "bodega@example.cl"))));
        uow.profiles
            .expect_set_banned_until()
            .withf(|_, until| until.is_some_and(|until| until > Utc::now() + Duration::days(365)))
            .returning(|id, until| {
                let mut user = account(id, "bodega@example.cl");
                user.banned_until = until;
                Ok(user)
            });
        uow.audit
            .expect_append()
            .withf(|record| record.description == "Usuario deshabilitado: bodega@example.cl")
            .returning(|record| Ok(stored_audit(record)));

        let service = UserManager::new(uow.build());
        let actor = Actor::new(Some(Uuid::new_v4()), "jefe@example.cl");
        let updated = service.set_enabled(id, false, actor).await.unwrap();

        assert_eq!(updated.status, UserStatus::Disabled);
    }

    #[tokio::test]
    async fn test_create_normalizes_email_and_rejects_duplicates() {
        let mut uow = TestUnitOfWork::default();
        uow.profiles
            .expect_email_taken()
            .withf(|email| email == "bodega@example.cl")
            .returning(|_| Ok(true));
        uow.profiles.expect_create().never();

        let service = UserManager::new(uow.build());
        let result = service
            .create_user(
                NewUser {
                    email: " Bodega@Example.cl ".to_string(),
                    password: "Hormigon2024!".to_string(),
                    display_name: "Bodega".to_string(),
                    role: UserRole::Editor,
                },
                Actor::new(None, "service-role"),
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let mut uow = TestUnitOfWork::default();
        uow.profiles.expect_email_taken().returning(|_| Ok(false));
        uow.profiles.expect_create().never();

        let service = UserManager::new(uow.build());
        let result = service
            .create_user(
                NewUser {
                    email: "nuevo@example.cl".to_string(),
                    password: "corta".to_string(),
                    display_name: "Nuevo".to_string(),
                    role: UserRole::Editor,
                },
                Actor::new(None, "service-role"),
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
