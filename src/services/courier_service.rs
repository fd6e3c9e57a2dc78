use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    audit,
    dto::couriers::{CourierList, CreateCourierRequest, UpdateCourierRequest},
    entity::pengirim::{self, ActiveModel as CourierActive, Column as CourierCol, Entity as Pengirim},
    error::{AppError, AppResult},
    middleware::auth::Principal,
    models::Courier,
    response::{ApiResponse, Meta},
    services::{
        auth_service::hash_password,
        identity::{account_for, farm_of},
        non_blank,
    },
    state::AppState,
};

async fn owned_courier(state: &AppState, principal: &Principal, id: i64) -> AppResult<pengirim::Model> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;
    Pengirim::find_by_id(id)
        .filter(CourierCol::FarmId.eq(farm.id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Courier"))
}

pub async fn create_courier(
    state: &AppState,
    principal: &Principal,
    payload: CreateCourierRequest,
) -> AppResult<ApiResponse<Courier>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;

    let nama = payload.nama.trim();
    let email = payload.email.trim().to_lowercase();
    let no_telp = payload.no_telp.trim();
    if nama.is_empty() || email.is_empty() || no_telp.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "nama, email, no_telp and password are required".into(),
        ));
    }

    let exist = Pengirim::find()
        .filter(
            Condition::any()
                .add(CourierCol::Email.eq(email.as_str()))
                .add(CourierCol::NoTelp.eq(no_telp)),
        )
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict(
            "A courier with this email or phone number already exists".into(),
        ));
    }

    let courier = CourierActive {
        id: NotSet,
        farm_id: Set(farm.id),
        nama: Set(nama.to_string()),
        email: Set(email),
        no_telp: Set(no_telp.to_string()),
        alamat: Set(non_blank(payload.alamat)),
        vehicle_plate: Set(non_blank(payload.vehicle_plate)),
        vehicle_type: Set(non_blank(payload.vehicle_type)),
        vehicle_color: Set(non_blank(payload.vehicle_color)),
        password_hash: Set(hash_password(&payload.password)?),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "courier_create",
        "pengirim",
        serde_json::json!({ "courier_id": courier.id, "farm_id": farm.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Courier created",
        courier.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_couriers(
    state: &AppState,
    principal: &Principal,
) -> AppResult<ApiResponse<CourierList>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;

    let items: Vec<Courier> = Pengirim::find()
        .filter(CourierCol::FarmId.eq(farm.id))
        .order_by_asc(CourierCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Courier::from)
        .collect();
    let total = items.len() as i64;

    Ok(ApiResponse::success(
        "Couriers",
        CourierList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get_courier(
    state: &AppState,
    principal: &Principal,
    id: i64,
) -> AppResult<ApiResponse<Courier>> {
    let courier = owned_courier(state, principal, id).await?;
    Ok(ApiResponse::success("Courier", courier.into(), Some(Meta::empty())))
}

pub async fn update_courier(
    state: &AppState,
    principal: &Principal,
    id: i64,
    payload: UpdateCourierRequest,
) -> AppResult<ApiResponse<Courier>> {
    let existing = owned_courier(state, principal, id).await?;

    let mut active: CourierActive = existing.into();
    if let Some(nama) = non_blank(payload.nama) {
        active.nama = Set(nama);
    }
    if let Some(email) = non_blank(payload.email) {
        active.email = Set(email.to_lowercase());
    }
    if let Some(no_telp) = non_blank(payload.no_telp) {
        active.no_telp = Set(no_telp);
    }
    if let Some(alamat) = non_blank(payload.alamat) {
        active.alamat = Set(Some(alamat));
    }
    if let Some(plate) = non_blank(payload.vehicle_plate) {
        active.vehicle_plate = Set(Some(plate));
    }
    if let Some(kind) = non_blank(payload.vehicle_type) {
        active.vehicle_type = Set(Some(kind));
    }
    if let Some(color) = non_blank(payload.vehicle_color) {
        active.vehicle_color = Set(Some(color));
    }

    let courier = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "courier_update",
        "pengirim",
        serde_json::json!({ "courier_id": courier.id }),
    )
    .await;

    Ok(ApiResponse::success("Updated", courier.into(), Some(Meta::empty())))
}

pub async fn delete_courier(
    state: &AppState,
    principal: &Principal,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let courier = owned_courier(state, principal, id).await?;
    Pengirim::delete_by_id(courier.id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "courier_delete",
        "pengirim",
        serde_json::json!({ "courier_id": courier.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
