use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Product, ShippingTariff};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_per_kg: Decimal,
    pub weight_per_unit: Option<Decimal>,
    pub stock_kg: Decimal,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_per_kg: Option<Decimal>,
    pub weight_per_unit: Option<Decimal>,
    pub stock_kg: Option<Decimal>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct TariffList {
    #[schema(value_type = Vec<ShippingTariff>)]
    pub items: Vec<ShippingTariff>,
}
