use axum::{Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::auth::{CourierLoginRequest, LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    models::Account,
    response::ApiResponse,
    routes::extract::Json,
    services::auth_service::{login_courier, login_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/courier/login", post(courier_login))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register account", body = ApiResponse<Account>),
        (status = 409, description = "Phone number or email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Account>>)> {
    let resp = register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login account", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/courier/login",
    request_body = CourierLoginRequest,
    responses(
        (status = 200, description = "Login courier", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn courier_login(
    State(state): State<AppState>,
    Json(payload): Json<CourierLoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_courier(&state, payload).await?;
    Ok(Json(resp))
}
