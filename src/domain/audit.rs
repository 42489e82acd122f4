//! Audit trail entries written on every admin mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Audited mutation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CREATE" => Some(AuditAction::Create),
            "UPDATE" => Some(AuditAction::Update),
            "DELETE" => Some(AuditAction::Delete),
            _ => None,
        }
    }
}

/// Who performed an admin mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// None for the service-role key
    pub id: Option<Uuid>,
    pub email: String,
}

impl Actor {
    pub fn new(id: Option<Uuid>, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Audit entry about to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditRecord {
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: String,
    pub description: String,
    pub actor_id: Option<Uuid>,
    pub actor_email: String,
}

impl NewAuditRecord {
    pub fn new(
        action: AuditAction,
        table_name: &str,
        record_id: impl ToString,
        description: impl Into<String>,
        actor: &Actor,
    ) -> Self {
        Self {
            action,
            table_name: table_name.to_string(),
            record_id: record_id.to_string(),
            description: description.into(),
            actor_id: actor.id,
            actor_email: actor.email.clone(),
        }
    }
}

/// Persisted audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuditRecord {
    pub id: i64,
    pub action: AuditAction,
    #[schema(example = "productos")]
    pub table_name: String,
    pub record_id: String,
    #[schema(example = "Producto creado: Cemento 25 kg")]
    pub description: String,
    pub actor_id: Option<Uuid>,
    pub actor_email: String,
    pub created_at: DateTime<Utc>,
}
