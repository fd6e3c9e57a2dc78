use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which table the token subject belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Akun,
    Pengirim,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub nama: String,
    pub no_telp: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub alamat: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CourierLoginRequest {
    pub no_telp: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub nama: String,
    pub role: String,
    pub kind: PrincipalKind,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub kind: PrincipalKind,
    pub role: String,
    pub exp: usize,
}
