//! Audit trail repository (`auditoria`). Append-only.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryOrder, QuerySelect, Set,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::audit::{self, ActiveModel, Entity as AuditEntity};
use crate::domain::{AuditRecord, NewAuditRecord};
use crate::errors::AppResult;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, record: NewAuditRecord) -> AppResult<AuditRecord>;
    /// Newest first, plus the total number of entries
    async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<AuditRecord>, u64)>;
}

/// SeaORM-backed audit repository
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditRepository for AuditStore {
    async fn append(&self, record: NewAuditRecord) -> AppResult<AuditRecord> {
        append(&self.db, record).await
    }

    async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<AuditRecord>, u64)> {
        let total = AuditEntity::find().count(&self.db).await?;
        let models = AuditEntity::find()
            .order_by_desc(audit::Column::CreatedAt)
            .order_by_desc(audit::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;
        Ok((models.into_iter().map(AuditRecord::from).collect(), total))
    }
}

pub(crate) async fn append<C: ConnectionTrait>(
    db: &C,
    record: NewAuditRecord,
) -> AppResult<AuditRecord> {
    let active = ActiveModel {
        id: NotSet,
        action: Set(record.action.as_str().to_string()),
        table_name: Set(record.table_name),
        record_id: Set(record.record_id),
        description: Set(record.description),
        actor_id: Set(record.actor_id),
        actor_email: Set(record.actor_email),
        created_at: Set(Utc::now()),
    };
    let model = active.insert(db).await?;
    Ok(AuditRecord::from(model))
}
