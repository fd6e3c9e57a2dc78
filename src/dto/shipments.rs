use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{GeoPoint, ShipmentProcess},
    status::ShipmentStatus,
    storage::ImageUpload,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShipmentRequest {
    pub id_invoice: i64,
    pub id_pengirim: Option<i64>,
    pub alamat_pengirim: Option<String>,
    pub alamat_penerima: Option<String>,
    pub location_pengirim: Option<GeoPoint>,
    pub location_penerima: Option<GeoPoint>,
    pub tanggal_dikirim: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ShipmentList {
    #[schema(value_type = Vec<ShipmentProcess>)]
    pub items: Vec<ShipmentProcess>,
}

/// Multipart body of `PUT /shipments/{id}` for the OpenAPI document.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UpdateShipmentForm {
    pub hari_dikirim: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub tanggal_dikirim: Option<String>,
    pub hari_diterima: Option<String>,
    pub tanggal_diterima: Option<String>,
    pub id_pengirim: Option<i64>,
    pub status_pengiriman: Option<String>,
    pub alamat_pengirim: Option<String>,
    pub alamat_penerima: Option<String>,
    /// `lon,lat`
    pub location_pengirim: Option<String>,
    /// `lon,lat`
    pub location_penerima: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// Partial update of a shipment process. `None` leaves the stored value as is;
/// absent and blank form fields both map to `None`.
#[derive(Debug, Default)]
pub struct ShipmentUpdate {
    pub hari_dikirim: Option<String>,
    pub tanggal_dikirim: Option<DateTime<Utc>>,
    pub hari_diterima: Option<String>,
    pub tanggal_diterima: Option<DateTime<Utc>>,
    pub id_pengirim: Option<i64>,
    pub status_pengiriman: Option<ShipmentStatus>,
    pub alamat_pengirim: Option<String>,
    pub alamat_penerima: Option<String>,
    pub location_pengirim: Option<GeoPoint>,
    pub location_penerima: Option<GeoPoint>,
    pub image: Option<ImageUpload>,
}

impl ShipmentUpdate {
    pub fn from_fields(
        mut fields: HashMap<String, String>,
        image: Option<ImageUpload>,
    ) -> AppResult<Self> {
        let mut take = |name: &str| {
            fields
                .remove(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let update = Self {
            hari_dikirim: take("hari_dikirim"),
            tanggal_dikirim: take("tanggal_dikirim")
                .map(|v| parse_timestamp("tanggal_dikirim", &v))
                .transpose()?,
            hari_diterima: take("hari_diterima"),
            tanggal_diterima: take("tanggal_diterima")
                .map(|v| parse_timestamp("tanggal_diterima", &v))
                .transpose()?,
            id_pengirim: take("id_pengirim")
                .map(|v| {
                    v.parse::<i64>().map_err(|_| {
                        AppError::BadRequest("id_pengirim must be a valid integer.".into())
                    })
                })
                .transpose()?,
            status_pengiriman: take("status_pengiriman")
                .map(|v| v.parse::<ShipmentStatus>())
                .transpose()?,
            alamat_pengirim: take("alamat_pengirim"),
            alamat_penerima: take("alamat_penerima"),
            location_pengirim: take("location_pengirim")
                .map(|v| parse_point("location_pengirim", &v))
                .transpose()?,
            location_penerima: take("location_penerima")
                .map(|v| parse_point("location_penerima", &v))
                .transpose()?,
            image,
        };

        for ignored in fields.keys() {
            tracing::debug!(field = %ignored, "ignoring unknown shipment form field");
        }

        Ok(update)
    }

    pub fn is_empty(&self) -> bool {
        self.hari_dikirim.is_none()
            && self.tanggal_dikirim.is_none()
            && self.hari_diterima.is_none()
            && self.tanggal_diterima.is_none()
            && self.id_pengirim.is_none()
            && self.status_pengiriman.is_none()
            && self.alamat_pengirim.is_none()
            && self.alamat_penerima.is_none()
            && self.location_pengirim.is_none()
            && self.location_penerima.is_none()
            && self.image.is_none()
    }
}

pub fn parse_timestamp(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            AppError::BadRequest(format!("{field} must be RFC 3339 or YYYY-MM-DD."))
        })
}

pub fn parse_point(field: &str, value: &str) -> AppResult<GeoPoint> {
    let invalid = || AppError::BadRequest(format!("{field} must be formatted as 'lon,lat'."));
    let (lon, lat) = value.split_once(',').ok_or_else(invalid)?;
    let point = GeoPoint {
        lon: lon.trim().parse().map_err(|_| invalid())?,
        lat: lat.trim().parse().map_err(|_| invalid())?,
    };
    if !point.is_valid() {
        return Err(AppError::BadRequest(format!("{field} is out of range.")));
    }
    Ok(point)
}
