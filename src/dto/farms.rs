use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::GeoPoint;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFarmRequest {
    pub name: String,
    #[serde(default)]
    pub farm_type: String,
    pub alamat: Option<String>,
    pub location: Option<GeoPoint>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateFarmRequest {
    pub name: Option<String>,
    pub farm_type: Option<String>,
    pub alamat: Option<String>,
    pub location: Option<GeoPoint>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}
