//! `productos` table

use sea_orm::entity::prelude::*;
use serde::de::DeserializeOwned;

use crate::domain::{Product, StockStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "productos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub sku: String,
    pub title: String,
    pub category_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub unit: String,
    pub stock_status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub specs: Json,
    pub technical_specs: Json,
    pub images: Json,
    pub published: bool,
    pub price_visible: bool,
    pub dimensions: Option<Json>,
    #[sea_orm(column_type = "Decimal(Some((10, 3)))", nullable)]
    pub weight_kg: Option<Decimal>,
    pub quick_specs: Json,
    pub resources: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Malformed JSON columns degrade to the empty value instead of failing reads.
fn from_json<T: DeserializeOwned + Default>(value: Json) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            sku: model.sku,
            title: model.title,
            category_id: model.category_id,
            price: model.price,
            unit: model.unit,
            stock_status: StockStatus::parse(&model.stock_status)
                .unwrap_or(StockStatus::OutOfStock),
            description: model.description,
            specs: from_json(model.specs),
            technical_specs: from_json(model.technical_specs),
            images: from_json(model.images),
            published: model.published,
            price_visible: model.price_visible,
            dimensions: model
                .dimensions
                .and_then(|value| serde_json::from_value(value).ok()),
            weight_kg: model.weight_kg,
            quick_specs: from_json(model.quick_specs),
            resources: from_json(model.resources),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
