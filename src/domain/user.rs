//! Admin user domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_EDITOR};

/// Back-office roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Editors and admins may manage the catalog
    pub fn can_edit_catalog(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Editor)
    }

    /// Strict parse for user input
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            ROLE_ADMIN => Some(UserRole::Admin),
            ROLE_EDITOR => Some(UserRole::Editor),
            _ => None,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::Editor,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::Editor => write!(f, "{}", ROLE_EDITOR),
        }
    }
}

/// Account status derived from the ban and delete timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Disabled,
    Deleted,
}

impl UserStatus {
    /// Deleted wins over disabled; a ban that already expired is active.
    pub fn derive(
        banned_until: Option<DateTime<Utc>>,
        deleted_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        if deleted_at.is_some() {
            UserStatus::Deleted
        } else if banned_until.is_some_and(|until| until > now) {
            UserStatus::Disabled
        } else {
            UserStatus::Active
        }
    }
}

/// Admin user domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: UserRole,
    pub banned_until: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    pub fn status(&self) -> UserStatus {
        UserStatus::derive(self.banned_until, self.deleted_at, Utc::now())
    }

    pub fn is_active(&self) -> bool {
        self.status() == UserStatus::Active
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Account about to be created
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: UserRole,
}

/// Partial account update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub password_hash: Option<String>,
}

/// Admin user response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminUserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "bodega@example.cl")]
    pub email: String,
    #[schema(example = "María Pérez")]
    pub display_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub banned_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<AdminUser> for AdminUserResponse {
    fn from(user: AdminUser) -> Self {
        let status = user.status();
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            status,
            banned_until: user.banned_until,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_derivation() {
        let now = Utc::now();
        assert_eq!(UserStatus::derive(None, None, now), UserStatus::Active);
        assert_eq!(
            UserStatus::derive(Some(now + Duration::days(1)), None, now),
            UserStatus::Disabled
        );
        assert_eq!(
            UserStatus::derive(Some(now - Duration::days(1)), None, now),
            UserStatus::Active
        );
        assert_eq!(
            UserStatus::derive(Some(now + Duration::days(1)), Some(now), now),
            UserStatus::Deleted
        );
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse(" Admin "), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("editor"), Some(UserRole::Editor));
        assert_eq!(UserRole::parse("owner"), None);
        assert_eq!(UserRole::from("unknown"), UserRole::Editor);
        assert!(UserRole::Editor.can_edit_catalog());
        assert!(!UserRole::Editor.is_admin());
    }
}
