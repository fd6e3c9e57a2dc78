use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::couriers::{CourierList, CreateCourierRequest, UpdateCourierRequest},
    error::AppResult,
    middleware::auth::Principal,
    models::Courier,
    response::ApiResponse,
    routes::extract::{Json, Path},
    services::courier_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_couriers).post(create_courier))
        .route(
            "/{id}",
            get(get_courier).put(update_courier).delete(delete_courier),
        )
}

#[utoipa::path(
    post,
    path = "/api/couriers",
    request_body = CreateCourierRequest,
    responses(
        (status = 201, description = "Courier registered for the caller's farm", body = ApiResponse<Courier>),
        (status = 409, description = "Email or phone number already used")
    ),
    security(("bearer_auth" = [])),
    tag = "Couriers"
)]
pub async fn create_courier(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateCourierRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Courier>>)> {
    let resp = courier_service::create_courier(&state, &principal, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/couriers",
    responses(
        (status = 200, description = "Couriers of the caller's farm", body = ApiResponse<CourierList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Couriers"
)]
pub async fn list_couriers(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<CourierList>>> {
    Ok(Json(courier_service::list_couriers(&state, &principal).await?))
}

#[utoipa::path(
    get,
    path = "/api/couriers/{id}",
    params(("id" = i64, Path, description = "Courier ID")),
    responses(
        (status = 200, description = "Courier", body = ApiResponse<Courier>),
        (status = 404, description = "Courier not found on the caller's farm")
    ),
    security(("bearer_auth" = [])),
    tag = "Couriers"
)]
pub async fn get_courier(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Courier>>> {
    Ok(Json(courier_service::get_courier(&state, &principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/couriers/{id}",
    params(("id" = i64, Path, description = "Courier ID")),
    request_body = UpdateCourierRequest,
    responses(
        (status = 200, description = "Courier updated", body = ApiResponse<Courier>),
        (status = 404, description = "Courier not found on the caller's farm")
    ),
    security(("bearer_auth" = [])),
    tag = "Couriers"
)]
pub async fn update_courier(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCourierRequest>,
) -> AppResult<Json<ApiResponse<Courier>>> {
    Ok(Json(
        courier_service::update_courier(&state, &principal, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/couriers/{id}",
    params(("id" = i64, Path, description = "Courier ID")),
    responses(
        (status = 200, description = "Courier deleted"),
        (status = 404, description = "Courier not found on the caller's farm")
    ),
    security(("bearer_auth" = [])),
    tag = "Couriers"
)]
pub async fn delete_courier(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(courier_service::delete_courier(&state, &principal, id).await?))
}
