//! Migration: back-office profiles and the audit trail.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Perfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Perfiles::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Perfiles::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Perfiles::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Perfiles::DisplayName).string_len(120).not_null())
                    .col(
                        ColumnDef::new(Perfiles::Role)
                            .string_len(20)
                            .not_null()
                            .default("editor"),
                    )
                    .col(
                        ColumnDef::new(Perfiles::BannedUntil)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Perfiles::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Perfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Perfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Auditoria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Auditoria::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Auditoria::Action).string_len(10).not_null())
                    .col(ColumnDef::new(Auditoria::TableName).string_len(64).not_null())
                    .col(ColumnDef::new(Auditoria::RecordId).string_len(64).not_null())
                    .col(ColumnDef::new(Auditoria::Description).text().not_null())
                    .col(ColumnDef::new(Auditoria::ActorId).uuid().null())
                    .col(ColumnDef::new(Auditoria::ActorEmail).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Auditoria::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auditoria_created_at")
                    .table(Auditoria::Table)
                    .col(Auditoria::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Auditoria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Perfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Perfiles {
    Table,
    Id,
    Email,
    PasswordHash,
    DisplayName,
    Role,
    BannedUntil,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Auditoria {
    Table,
    Id,
    Action,
    TableName,
    RecordId,
    Description,
    ActorId,
    ActorEmail,
    CreatedAt,
}
