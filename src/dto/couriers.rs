use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Courier;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourierRequest {
    pub nama: String,
    pub email: String,
    pub no_telp: String,
    pub password: String,
    pub alamat: Option<String>,
    pub vehicle_plate: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_color: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCourierRequest {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub no_telp: Option<String>,
    pub alamat: Option<String>,
    pub vehicle_plate: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_color: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CourierList {
    #[schema(value_type = Vec<Courier>)]
    pub items: Vec<Courier>,
}
