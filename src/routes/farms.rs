use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::farms::{CreateFarmRequest, UpdateFarmRequest},
    error::AppResult,
    middleware::auth::Principal,
    models::Farm,
    response::ApiResponse,
    routes::extract::Json,
    services::farm_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_farm))
        .route("/mine", get(my_farm).put(update_farm).delete(delete_farm))
}

#[utoipa::path(
    post,
    path = "/api/farms",
    request_body = CreateFarmRequest,
    responses(
        (status = 201, description = "Farm registered", body = ApiResponse<Farm>),
        (status = 409, description = "Account already owns a farm")
    ),
    security(("bearer_auth" = [])),
    tag = "Farms"
)]
pub async fn create_farm(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateFarmRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Farm>>)> {
    let resp = farm_service::create_farm(&state, &principal, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/farms/mine",
    responses(
        (status = 200, description = "Caller's farm", body = ApiResponse<Farm>),
        (status = 404, description = "Caller has no farm")
    ),
    security(("bearer_auth" = [])),
    tag = "Farms"
)]
pub async fn my_farm(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<Farm>>> {
    Ok(Json(farm_service::my_farm(&state, &principal).await?))
}

#[utoipa::path(
    put,
    path = "/api/farms/mine",
    request_body = UpdateFarmRequest,
    responses(
        (status = 200, description = "Farm updated", body = ApiResponse<Farm>),
        (status = 400, description = "Nothing to update or invalid location"),
        (status = 404, description = "Caller has no farm")
    ),
    security(("bearer_auth" = [])),
    tag = "Farms"
)]
pub async fn update_farm(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<UpdateFarmRequest>,
) -> AppResult<Json<ApiResponse<Farm>>> {
    Ok(Json(farm_service::update_farm(&state, &principal, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/farms/mine",
    responses(
        (status = 200, description = "Farm deleted, owner is a buyer again", body = ApiResponse<Farm>),
        (status = 404, description = "Caller has no farm"),
        (status = 409, description = "Farm products appear on orders")
    ),
    security(("bearer_auth" = [])),
    tag = "Farms"
)]
pub async fn delete_farm(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<Farm>>> {
    Ok(Json(farm_service::delete_farm(&state, &principal).await?))
}
