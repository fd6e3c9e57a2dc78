use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::shipments::{CreateShipmentRequest, ShipmentList, ShipmentUpdate, UpdateShipmentForm},
    error::AppResult,
    middleware::auth::Principal,
    models::ShipmentProcess,
    response::ApiResponse,
    routes::{
        extract::{Json, Multipart, Path},
        multipart::read_form,
    },
    services::shipment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_for_buyer).post(create_shipment))
        .route("/farm", get(list_for_farm))
        .route("/courier", get(list_for_courier))
        .route("/{id}", get(get_shipment).put(update_shipment))
}

#[utoipa::path(
    post,
    path = "/api/shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment created", body = ApiResponse<ShipmentProcess>),
        (status = 404, description = "Invoice has no product of the caller's farm")
    ),
    security(("bearer_auth" = [])),
    tag = "Shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateShipmentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ShipmentProcess>>)> {
    let resp = shipment_service::create_shipment(&state, &principal, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/shipments",
    responses(
        (status = 200, description = "Shipments of the caller's invoices", body = ApiResponse<ShipmentList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Shipments"
)]
pub async fn list_for_buyer(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<ShipmentList>>> {
    Ok(Json(shipment_service::list_for_buyer(&state, &principal).await?))
}

#[utoipa::path(
    get,
    path = "/api/shipments/farm",
    responses(
        (status = 200, description = "Shipments of the caller's farm", body = ApiResponse<ShipmentList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Shipments"
)]
pub async fn list_for_farm(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<ShipmentList>>> {
    Ok(Json(shipment_service::list_for_farm(&state, &principal).await?))
}

#[utoipa::path(
    get,
    path = "/api/shipments/courier",
    responses(
        (status = 200, description = "Shipments assigned to the calling courier", body = ApiResponse<ShipmentList>),
        (status = 403, description = "Caller is not a courier")
    ),
    security(("bearer_auth" = [])),
    tag = "Shipments"
)]
pub async fn list_for_courier(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<ShipmentList>>> {
    Ok(Json(shipment_service::list_for_courier(&state, &principal).await?))
}

#[utoipa::path(
    get,
    path = "/api/shipments/{id}",
    params(("id" = i64, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment", body = ApiResponse<ShipmentProcess>),
        (status = 404, description = "Shipment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Shipments"
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ShipmentProcess>>> {
    Ok(Json(shipment_service::get_shipment(&state, &principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/shipments/{id}",
    params(("id" = i64, Path, description = "Shipment ID")),
    request_body(content = UpdateShipmentForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Shipment updated", body = ApiResponse<ShipmentProcess>),
        (status = 400, description = "Invalid field or illegal status transition"),
        (status = 403, description = "Caller is neither the assigned courier nor the farm owner"),
        (status = 404, description = "Shipment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Shipments"
)]
pub async fn update_shipment(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ShipmentProcess>>> {
    let form = read_form(multipart, "image").await?;
    let update = ShipmentUpdate::from_fields(form.fields, form.file)?;
    Ok(Json(
        shipment_service::update_shipment(&state, &principal, id, update).await?,
    ))
}
