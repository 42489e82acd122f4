//! `auditoria` table: append-only admin history

use sea_orm::entity::prelude::*;

use crate::domain::{AuditAction, AuditRecord};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "auditoria")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub action: String,
    pub table_name: String,
    pub record_id: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub actor_id: Option<Uuid>,
    pub actor_email: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AuditRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            action: AuditAction::parse(&model.action).unwrap_or(AuditAction::Update),
            table_name: model.table_name,
            record_id: model.record_id,
            description: model.description,
            actor_id: model.actor_id,
            actor_email: model.actor_email,
            created_at: model.created_at,
        }
    }
}
