use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{akun, farm_products, farms, invoice, orders, pengirim, pengiriman, proses_pengiriman};

/// A longitude/latitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn from_parts(lon: Option<f64>, lat: Option<f64>) -> Option<Self> {
        match (lon, lat) {
            (Some(lon), Some(lat)) => Some(Self { lon, lat }),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: i64,
    pub nama: String,
    pub no_telp: String,
    pub email: String,
    pub role: String,
    pub alamat: Option<String>,
    pub location: Option<GeoPoint>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Farm {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub farm_type: String,
    pub alamat: Option<String>,
    pub location: Option<GeoPoint>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub farm_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_per_kg: Decimal,
    pub weight_per_unit: Option<Decimal>,
    pub stock_kg: Decimal,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShippingTariff {
    pub id: i64,
    pub name: String,
    pub fuel_consumption: Decimal,
    pub fuel_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Courier {
    pub id: i64,
    pub farm_id: i64,
    pub nama: String,
    pub email: String,
    pub no_telp: String,
    pub alamat: Option<String>,
    pub vehicle_plate: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    pub id: i64,
    pub user_id: i64,
    pub invoice_number: String,
    pub payment_status: String,
    pub payment_method: String,
    pub issued_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub total_harga_product: Decimal,
    pub shipping_cost: Decimal,
    pub proof_of_transfer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub total_harga: Decimal,
    pub status: String,
    pub pengiriman_id: i64,
    pub invoice_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShipmentProcess {
    pub id: i64,
    pub id_invoice: i64,
    pub id_farm: i64,
    pub id_pengirim: Option<i64>,
    pub hari_dikirim: Option<String>,
    pub tanggal_dikirim: Option<DateTime<Utc>>,
    pub hari_diterima: Option<String>,
    pub tanggal_diterima: Option<DateTime<Utc>>,
    pub status_pengiriman: String,
    pub alamat_pengirim: Option<String>,
    pub alamat_penerima: Option<String>,
    pub location_pengirim: Option<GeoPoint>,
    pub location_penerima: Option<GeoPoint>,
    pub image_pengiriman: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<akun::Model> for Account {
    fn from(model: akun::Model) -> Self {
        Self {
            id: model.id,
            nama: model.nama,
            no_telp: model.no_telp,
            email: model.email,
            role: model.role,
            alamat: model.alamat,
            location: GeoPoint::from_parts(model.lon, model.lat),
            image_url: model.image_url,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<farms::Model> for Farm {
    fn from(model: farms::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            farm_type: model.farm_type,
            alamat: model.alamat,
            location: GeoPoint::from_parts(model.lon, model.lat),
            phone: model.phone,
            email: model.email,
            image_url: model.image_url,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<farm_products::Model> for Product {
    fn from(model: farm_products::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            name: model.name,
            description: model.description,
            price_per_kg: model.price_per_kg,
            weight_per_unit: model.weight_per_unit,
            stock_kg: model.stock_kg,
            image_url: model.image_url,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<pengiriman::Model> for ShippingTariff {
    fn from(model: pengiriman::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            fuel_consumption: model.fuel_consumption,
            fuel_price: model.fuel_price,
        }
    }
}

impl From<pengirim::Model> for Courier {
    fn from(model: pengirim::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            nama: model.nama,
            email: model.email,
            no_telp: model.no_telp,
            alamat: model.alamat,
            vehicle_plate: model.vehicle_plate,
            vehicle_type: model.vehicle_type,
            vehicle_color: model.vehicle_color,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<invoice::Model> for Invoice {
    fn from(model: invoice::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            invoice_number: model.invoice_number,
            payment_status: model.payment_status,
            payment_method: model.payment_method,
            issued_date: model.issued_date.with_timezone(&Utc),
            due_date: model.due_date.with_timezone(&Utc),
            total_amount: model.total_amount,
            total_harga_product: model.total_harga_product,
            shipping_cost: model.shipping_cost,
            proof_of_transfer: model.proof_of_transfer,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<orders::Model> for OrderLine {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            quantity: model.quantity,
            total_harga: model.total_harga,
            status: model.status,
            pengiriman_id: model.pengiriman_id,
            invoice_id: model.invoice_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<proses_pengiriman::Model> for ShipmentProcess {
    fn from(model: proses_pengiriman::Model) -> Self {
        Self {
            id: model.id,
            id_invoice: model.id_invoice,
            id_farm: model.id_farm,
            id_pengirim: model.id_pengirim,
            hari_dikirim: model.hari_dikirim,
            tanggal_dikirim: model.tanggal_dikirim.map(|dt| dt.with_timezone(&Utc)),
            hari_diterima: model.hari_diterima,
            tanggal_diterima: model.tanggal_diterima.map(|dt| dt.with_timezone(&Utc)),
            status_pengiriman: model.status_pengiriman,
            alamat_pengirim: model.alamat_pengirim,
            alamat_penerima: model.alamat_penerima,
            location_pengirim: GeoPoint::from_parts(model.pengirim_lon, model.pengirim_lat),
            location_penerima: GeoPoint::from_parts(model.penerima_lon, model.penerima_lat),
            image_pengiriman: model.image_pengiriman,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
