use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{GeoPoint, Invoice};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartItem {
    pub product_id: i64,
    pub quantity: i32,
}

/// Addresses for the shipment record created together with the invoice.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ShipmentDraft {
    pub alamat_pengirim: Option<String>,
    pub alamat_penerima: Option<String>,
    pub location_pengirim: Option<GeoPoint>,
    pub location_penerima: Option<GeoPoint>,
    pub id_pengirim: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub products: Vec<CartItem>,
    #[serde(default)]
    pub pengiriman_id: i64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub distance_km: Decimal,
    pub shipment: Option<ShipmentDraft>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub invoice_id: i64,
    pub invoice_number: String,
    pub total_harga: String,
    pub shipping_cost: String,
    pub total_amount: String,
    pub shipment_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub invoice_id: i64,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatusUpdated {
    pub invoice_id: i64,
    pub status: String,
    pub updated_lines: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteOrderRequest {
    pub invoice_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDeleted {
    pub invoice_id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceQuery {
    pub id_invoice: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProofOfTransferUploaded {
    pub invoice_id: i64,
    pub proof_of_transfer: String,
    pub payment_status: String,
}

#[derive(Debug, Serialize, PartialEq, ToSchema, sqlx::FromRow)]
pub struct InvoiceLine {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub total_harga: Decimal,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceWithLines {
    pub invoice: Invoice,
    pub orders: Vec<InvoiceLine>,
}

/// Flat row of the buyer order history query, grouped into [`UserOrderGroup`].
#[derive(Debug, sqlx::FromRow)]
pub struct UserOrderRow {
    pub order_id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price_per_kg: Decimal,
    pub quantity: i32,
    pub total_harga: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub payment_status: String,
    pub payment_method: String,
    pub issued_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub proof_of_transfer: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserOrderProduct {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price_per_kg: Decimal,
    pub quantity: i32,
    pub total_harga: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserOrderGroup {
    pub invoice_id: i64,
    pub invoice_number: String,
    pub total_amount: String,
    pub payment_status: String,
    pub payment_method: String,
    pub issued_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub proof_of_transfer: Option<String>,
    pub products: Vec<UserOrderProduct>,
}

/// Flat row of the farm order query, grouped into [`FarmOrderGroup`].
#[derive(Debug, sqlx::FromRow)]
pub struct FarmOrderRow {
    pub order_id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub total_harga: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub proof_of_transfer: Option<String>,
    pub nama_pembeli: String,
    pub no_telp: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FarmOrderProduct {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub total_harga: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FarmOrderGroup {
    pub invoice_id: i64,
    pub invoice_number: String,
    pub total_amount: String,
    pub nama_pembeli: String,
    pub no_telp: String,
    pub email: String,
    pub proof_of_transfer: Option<String>,
    pub products: Vec<FarmOrderProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserOrderHistory {
    #[schema(value_type = Vec<UserOrderGroup>)]
    pub items: Vec<UserOrderGroup>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FarmOrderList {
    #[schema(value_type = Vec<FarmOrderGroup>)]
    pub items: Vec<FarmOrderGroup>,
}
