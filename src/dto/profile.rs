use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::GeoPoint;

/// Fields left out or blank keep their stored value. The phone number is the
/// login subject and cannot be changed here.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub alamat: Option<String>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileDeleted {
    pub id: i64,
}

/// Multipart body of `PUT /api/profile/image`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ProfileImageForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}
