use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::{
    dto::orders::{
        CreateOrderRequest, CreateOrderResponse, DeleteOrderRequest, FarmOrderList,
        InvoiceQuery, InvoiceWithLines, OrderDeleted, OrderStatusUpdated,
        ProofOfTransferUploaded, UpdateOrderStatusRequest, UserOrderHistory,
    },
    error::{AppError, AppResult},
    middleware::auth::Principal,
    response::ApiResponse,
    routes::{
        extract::{Json, Multipart, Query},
        multipart::read_form,
    },
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/update", put(update_order_status))
        .route("/delete", delete(delete_order))
        .route("/bukti-transfer", put(upload_proof_of_transfer))
        .route("/by", get(get_order_by_invoice))
        .route("/user", get(list_user_orders))
        .route("/farm", get(list_farm_orders))
}

#[utoipa::path(
    post,
    path = "/api/order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order and invoice created", body = ApiResponse<CreateOrderResponse>),
        (status = 400, description = "Invalid cart, tariff or insufficient stock"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreateOrderResponse>>)> {
    let resp = order_service::create_order(&state, &principal, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/order/update",
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated on every line of the invoice", body = ApiResponse<OrderStatusUpdated>),
        (status = 400, description = "Unknown status or illegal transition"),
        (status = 404, description = "Invoice not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderStatusUpdated>>> {
    let resp = order_service::update_order_status(&state, &principal, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/order/delete",
    request_body = DeleteOrderRequest,
    responses(
        (status = 200, description = "Invoice, lines and shipments deleted", body = ApiResponse<OrderDeleted>),
        (status = 404, description = "Invoice not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<DeleteOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderDeleted>>> {
    let resp = order_service::delete_order(&state, &principal, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/order/bukti-transfer",
    params(InvoiceQuery),
    request_body(content_type = "multipart/form-data", description = "Image in the `bukti_transfer` part"),
    responses(
        (status = 200, description = "Proof of transfer stored", body = ApiResponse<ProofOfTransferUploaded>),
        (status = 400, description = "Missing, oversized or unsupported image"),
        (status = 502, description = "Object storage rejected the upload")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn upload_proof_of_transfer(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<InvoiceQuery>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<ProofOfTransferUploaded>>> {
    let form = read_form(multipart, "bukti_transfer").await?;
    let image = form
        .file
        .ok_or_else(|| AppError::BadRequest("Failed to retrieve file from form.".into()))?;
    let resp =
        order_service::upload_proof_of_transfer(&state, &principal, query.id_invoice, image)
            .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/order/by",
    params(InvoiceQuery),
    responses(
        (status = 200, description = "Invoice with its order lines", body = ApiResponse<InvoiceWithLines>),
        (status = 404, description = "Invoice not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order_by_invoice(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<InvoiceQuery>,
) -> AppResult<Json<ApiResponse<InvoiceWithLines>>> {
    let resp = order_service::get_order_by_invoice(&state, &principal, query.id_invoice).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/order/user",
    responses(
        (status = 200, description = "Caller's orders grouped by invoice", body = ApiResponse<UserOrderHistory>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_user_orders(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<UserOrderHistory>>> {
    let resp = order_service::list_orders_by_user(&state, &principal).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/order/farm",
    responses(
        (status = 200, description = "Orders for the caller's farm grouped by invoice", body = ApiResponse<FarmOrderList>),
        (status = 404, description = "Caller has no farm")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_farm_orders(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<FarmOrderList>>> {
    let resp = order_service::list_orders_by_farm(&state, &principal).await?;
    Ok(Json(resp))
}
