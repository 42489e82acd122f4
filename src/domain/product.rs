//! Product domain entity and related types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stock availability as shown on the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum StockStatus {
    #[serde(rename = "EN STOCK")]
    InStock,
    #[serde(rename = "SIN STOCK")]
    OutOfStock,
    #[serde(rename = "A PEDIDO")]
    OnOrder,
    #[serde(rename = "BAJO STOCK")]
    LowStock,
}

impl StockStatus {
    pub const ALL: [StockStatus; 4] = [
        StockStatus::InStock,
        StockStatus::OutOfStock,
        StockStatus::OnOrder,
        StockStatus::LowStock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "EN STOCK",
            StockStatus::OutOfStock => "SIN STOCK",
            StockStatus::OnOrder => "A PEDIDO",
            StockStatus::LowStock => "BAJO STOCK",
        }
    }

    /// Parse a stored or user-supplied label; tolerant of case and underscores.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().replace('_', " ").to_uppercase();
        Self::ALL.into_iter().find(|s| s.as_str() == normalized)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, StockStatus::InStock | StockStatus::LowStock)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical dimensions in centimeters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dimensions {
    pub length_cm: Option<Decimal>,
    pub width_cm: Option<Decimal>,
    pub height_cm: Option<Decimal>,
}

/// Short label/value pair shown on product cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuickSpec {
    #[schema(example = "Rendimiento")]
    pub label: String,
    #[schema(example = "1,2 m² por saco")]
    pub value: String,
}

/// Downloadable resource (data sheet, installation guide, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductResource {
    #[schema(example = "Ficha técnica")]
    pub title: String,
    #[schema(example = "https://cdn.example.com/fichas/cemento.pdf")]
    pub url: String,
    #[schema(example = "pdf")]
    pub kind: Option<String>,
}

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub title: String,
    pub category_id: Uuid,
    pub price: Decimal,
    pub unit: String,
    pub stock_status: StockStatus,
    pub description: Option<String>,
    pub specs: BTreeMap<String, String>,
    pub technical_specs: BTreeMap<String, String>,
    pub images: Vec<String>,
    pub published: bool,
    pub price_visible: bool,
    pub dimensions: Option<Dimensions>,
    pub weight_kg: Option<Decimal>,
    pub quick_specs: Vec<QuickSpec>,
    pub resources: Vec<ProductResource>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a product
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub sku: String,
    pub title: String,
    pub category_id: Uuid,
    pub price: Decimal,
    pub unit: String,
    pub stock_status: Option<StockStatus>,
    pub description: Option<String>,
    pub specs: BTreeMap<String, String>,
    pub technical_specs: BTreeMap<String, String>,
    pub images: Vec<String>,
    pub published: bool,
    pub price_visible: bool,
    pub dimensions: Option<Dimensions>,
    pub weight_kg: Option<Decimal>,
    pub quick_specs: Vec<QuickSpec>,
    pub resources: Vec<ProductResource>,
}

/// Public product representation. Price is withheld when not visible.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    #[schema(example = "CEM-POL-25")]
    pub sku: String,
    #[schema(example = "Cemento Polpaico 25 kg")]
    pub title: String,
    pub category_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "5490")]
    pub price: Option<Decimal>,
    #[schema(example = "saco")]
    pub unit: String,
    pub stock_status: StockStatus,
    pub description: Option<String>,
    pub specs: BTreeMap<String, String>,
    pub technical_specs: BTreeMap<String, String>,
    pub images: Vec<String>,
    pub dimensions: Option<Dimensions>,
    #[schema(value_type = Option<String>)]
    pub weight_kg: Option<Decimal>,
    pub quick_specs: Vec<QuickSpec>,
    pub resources: Vec<ProductResource>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            sku: product.sku,
            title: product.title,
            category_id: product.category_id,
            price: product.price_visible.then_some(product.price),
            unit: product.unit,
            stock_status: product.stock_status,
            description: product.description,
            specs: product.specs,
            technical_specs: product.technical_specs,
            images: product.images,
            dimensions: product.dimensions,
            weight_kg: product.weight_kg,
            quick_specs: product.quick_specs,
            resources: product.resources,
        }
    }
}

/// Admin product representation (always includes price and flags)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminProductResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    #[schema(value_type = String)]
    pub list_price: Decimal,
    pub published: bool,
    pub price_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for AdminProductResponse {
    fn from(product: Product) -> Self {
        let list_price = product.price;
        let published = product.published;
        let price_visible = product.price_visible;
        let created_at = product.created_at;
        let updated_at = product.updated_at;
        Self {
            product: ProductResponse::from(product),
            list_price,
            published,
            price_visible,
            created_at,
            updated_at,
        }
    }
}

/// Kind of storefront interaction tracked for popularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Click,
    Favorite,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Click => "click",
            InteractionKind::Favorite => "favorite",
        }
    }
}

/// Sort order for public product listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Recent,
    PriceAsc,
    PriceDesc,
    Title,
}

/// Listing filters (already validated)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_ids: Vec<Uuid>,
    pub stock_status: Option<StockStatus>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub published_only: bool,
    pub sort: ProductSort,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(price_visible: bool) -> Product {
        Product {
            id: Uuid::new_v4(),
            sku: "CEM-25".to_string(),
            title: "Cemento 25 kg".to_string(),
            category_id: Uuid::new_v4(),
            price: Decimal::new(5490, 0),
            unit: "saco".to_string(),
            stock_status: StockStatus::InStock,
            description: None,
            specs: BTreeMap::new(),
            technical_specs: BTreeMap::new(),
            images: vec![],
            published: true,
            price_visible,
            dimensions: None,
            weight_kg: None,
            quick_specs: vec![],
            resources: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_stock_status_labels() {
        assert_eq!(
            serde_json::to_string(&StockStatus::OnOrder).unwrap(),
            "\"A PEDIDO\""
        );
        assert_eq!(StockStatus::parse("bajo_stock"), Some(StockStatus::LowStock));
        assert_eq!(StockStatus::parse("sin stock"), Some(StockStatus::OutOfStock));
        assert_eq!(StockStatus::parse("agotado"), None);
    }

    #[test]
    fn test_hidden_price_is_omitted() {
        let response = ProductResponse::from(product(false));
        assert!(response.price.is_none());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("price").is_none());

        let response = ProductResponse::from(product(true));
        assert_eq!(response.price, Some(Decimal::new(5490, 0)));
    }

    #[test]
    fn test_admin_response_keeps_list_price() {
        let response = AdminProductResponse::from(product(false));
        assert_eq!(response.list_price, Decimal::new(5490, 0));
        assert!(!response.price_visible);
    }
}
