//! Migration: categories and products.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categorias::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Categorias::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Categorias::Name).string_len(120).not_null())
                    .col(
                        ColumnDef::new(Categorias::Slug)
                            .string_len(140)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Categorias::Description).text().null())
                    .col(
                        ColumnDef::new(Categorias::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Categorias::ParentId).uuid().null())
                    .col(
                        ColumnDef::new(Categorias::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Categorias::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categorias_parent")
                            .from(Categorias::Table, Categorias::ParentId)
                            .to(Categorias::Table, Categorias::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Productos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Productos::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Productos::Sku)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Productos::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Productos::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Productos::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Productos::Unit).string_len(32).not_null())
                    .col(ColumnDef::new(Productos::StockStatus).string_len(20).not_null())
                    .col(ColumnDef::new(Productos::Description).text().null())
                    .col(&mut json_col(Productos::Specs, "{}"))
                    .col(&mut json_col(Productos::TechnicalSpecs, "{}"))
                    .col(&mut json_col(Productos::Images, "[]"))
                    .col(
                        ColumnDef::new(Productos::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Productos::PriceVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Productos::Dimensions).json_binary().null())
                    .col(ColumnDef::new(Productos::WeightKg).decimal_len(10, 3).null())
                    .col(&mut json_col(Productos::QuickSpecs, "[]"))
                    .col(&mut json_col(Productos::Resources, "[]"))
                    .col(
                        ColumnDef::new(Productos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Productos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_productos_categoria")
                            .from(Productos::Table, Productos::CategoryId)
                            .to(Categorias::Table, Categorias::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_productos_category_id")
                    .table(Productos::Table)
                    .col(Productos::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Productos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categorias::Table).to_owned())
            .await
    }
}

fn json_col<T: IntoIden>(name: T, default: &str) -> ColumnDef {
    ColumnDef::new(name)
        .json_binary()
        .not_null()
        .default(Expr::cust(format!("'{}'::jsonb", default)))
        .to_owned()
}

#[derive(Iden)]
pub enum Categorias {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Active,
    ParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Productos {
    Table,
    Id,
    Sku,
    Title,
    CategoryId,
    Price,
    Unit,
    StockStatus,
    Description,
    Specs,
    TechnicalSpecs,
    Images,
    Published,
    PriceVisible,
    Dimensions,
    WeightKg,
    QuickSpecs,
    Resources,
    CreatedAt,
    UpdatedAt,
}
