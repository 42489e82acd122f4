//! Migration: error fallback store and product interaction log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ErrorFallback::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ErrorFallback::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ErrorFallback::Fingerprint).char_len(64).not_null())
                    .col(
                        ColumnDef::new(ErrorFallback::Bucket)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ErrorFallback::Severity).string_len(10).not_null())
                    .col(ColumnDef::new(ErrorFallback::Source).string_len(10).not_null())
                    .col(ColumnDef::new(ErrorFallback::Route).string_len(200).not_null())
                    .col(ColumnDef::new(ErrorFallback::Action).string_len(120).not_null())
                    .col(ColumnDef::new(ErrorFallback::Message).text().not_null())
                    .col(ColumnDef::new(ErrorFallback::Stack).text().null())
                    .col(ColumnDef::new(ErrorFallback::Environment).string_len(40).not_null())
                    .col(ColumnDef::new(ErrorFallback::Release).string_len(80).not_null())
                    .col(
                        ColumnDef::new(ErrorFallback::Context)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'null'::jsonb")),
                    )
                    .col(ColumnDef::new(ErrorFallback::ActorHash).char_len(64).not_null())
                    .col(
                        ColumnDef::new(ErrorFallback::Occurrences)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(ErrorFallback::FirstSeen)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ErrorFallback::LastSeen)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_error_fallback_fingerprint_bucket")
                    .table(ErrorFallback::Table)
                    .col(ErrorFallback::Fingerprint)
                    .col(ErrorFallback::Bucket)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductInteractions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductInteractions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductInteractions::ProductId).uuid().not_null())
                    .col(ColumnDef::new(ProductInteractions::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(ProductInteractions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_interactions_producto")
                            .from(ProductInteractions::Table, ProductInteractions::ProductId)
                            .to(Productos::Table, Productos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_interactions_created_at")
                    .table(ProductInteractions::Table)
                    .col(ProductInteractions::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductInteractions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ErrorFallback::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ErrorFallback {
    Table,
    Id,
    Fingerprint,
    Bucket,
    Severity,
    Source,
    Route,
    Action,
    Message,
    Stack,
    Environment,
    Release,
    Context,
    ActorHash,
    Occurrences,
    FirstSeen,
    LastSeen,
}

#[derive(Iden)]
enum ProductInteractions {
    Table,
    Id,
    ProductId,
    Kind,
    CreatedAt,
}

#[derive(Iden)]
enum Productos {
    Table,
    Id,
}
