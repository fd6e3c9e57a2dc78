use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};

use crate::{
    audit,
    dto::farms::{CreateFarmRequest, UpdateFarmRequest},
    entity::{
        akun::{Column as AkunCol, Entity as Akun},
        farms::{ActiveModel as FarmActive, Column as FarmCol, Entity as Farms},
    },
    error::{AppError, AppResult},
    middleware::auth::Principal,
    models::Farm,
    response::{ApiResponse, Meta},
    services::{
        auth_service::{ROLE_BUYER, ROLE_FARMER},
        identity::{account_for, farm_of, find_farm_of},
        non_blank,
    },
    state::AppState,
};

/// Register the caller's farm. An account owns at most one farm and becomes a
/// farmer once it has one.
pub async fn create_farm(
    state: &AppState,
    principal: &Principal,
    payload: CreateFarmRequest,
) -> AppResult<ApiResponse<Farm>> {
    let account = account_for(&state.orm, principal).await?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if payload.location.is_some_and(|p| !p.is_valid()) {
        return Err(AppError::BadRequest("location is out of range".into()));
    }

    let txn = state.orm.begin().await?;
    if find_farm_of(&txn, account.id).await?.is_some() {
        return Err(AppError::Conflict("This account already owns a farm".into()));
    }

    let farm = FarmActive {
        id: NotSet,
        owner_id: Set(account.id),
        name: Set(payload.name.trim().to_string()),
        farm_type: Set(payload.farm_type),
        alamat: Set(payload.alamat),
        lon: Set(payload.location.map(|p| p.lon)),
        lat: Set(payload.location.map(|p| p.lat)),
        phone: Set(payload.phone),
        email: Set(payload.email),
        image_url: Set(payload.image_url),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    Akun::update_many()
        .col_expr(AkunCol::Role, Expr::value(ROLE_FARMER))
        .col_expr(AkunCol::UpdatedAt, Expr::current_timestamp().into())
        .filter(AkunCol::Id.eq(account.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(farm_id = farm.id, owner_id = account.id, "farm registered");
    audit::record(
        &state.pool,
        &principal.subject,
        "farm_create",
        "farms",
        serde_json::json!({ "farm_id": farm.id }),
    )
    .await;

    Ok(ApiResponse::success("Farm created", farm.into(), Some(Meta::empty())))
}

pub async fn my_farm(state: &AppState, principal: &Principal) -> AppResult<ApiResponse<Farm>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;
    Ok(ApiResponse::success("Farm", farm.into(), Some(Meta::empty())))
}

pub async fn update_farm(
    state: &AppState,
    principal: &Principal,
    payload: UpdateFarmRequest,
) -> AppResult<ApiResponse<Farm>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;
    if payload.location.is_some_and(|p| !p.is_valid()) {
        return Err(AppError::BadRequest("location is out of range".into()));
    }

    let mut active: FarmActive = farm.into();
    if let Some(name) = non_blank(payload.name) {
        active.name = Set(name);
    }
    if let Some(farm_type) = non_blank(payload.farm_type) {
        active.farm_type = Set(farm_type);
    }
    if let Some(alamat) = non_blank(payload.alamat) {
        active.alamat = Set(Some(alamat));
    }
    if let Some(point) = payload.location {
        active.lon = Set(Some(point.lon));
        active.lat = Set(Some(point.lat));
    }
    if let Some(phone) = non_blank(payload.phone) {
        active.phone = Set(Some(phone));
    }
    if let Some(email) = non_blank(payload.email) {
        active.email = Set(Some(email));
    }
    if let Some(image_url) = non_blank(payload.image_url) {
        active.image_url = Set(Some(image_url));
    }
    if !active.is_changed() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }
    let farm = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "farm_update",
        "farms",
        serde_json::json!({ "farm_id": farm.id }),
    )
    .await;

    Ok(ApiResponse::success("Farm updated", farm.into(), Some(Meta::empty())))
}

/// Close the caller's farm. Its products and couriers go with it and the owner
/// is a buyer again. Farms whose products were ordered cannot be closed.
pub async fn delete_farm(state: &AppState, principal: &Principal) -> AppResult<ApiResponse<Farm>> {
    let account = account_for(&state.orm, principal).await?;

    let txn = state.orm.begin().await?;
    let farm = Farms::find()
        .filter(FarmCol::OwnerId.eq(account.id))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Farm"))?;
    farm.clone().delete(&txn).await?;

    Akun::update_many()
        .col_expr(AkunCol::Role, Expr::value(ROLE_BUYER))
        .col_expr(AkunCol::UpdatedAt, Expr::current_timestamp().into())
        .filter(AkunCol::Id.eq(account.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(farm_id = farm.id, owner_id = account.id, "farm closed");
    audit::record(
        &state.pool,
        &principal.subject,
        "farm_delete",
        "farms",
        serde_json::json!({ "farm_id": farm.id }),
    )
    .await;

    Ok(ApiResponse::success("Farm deleted", farm.into(), Some(Meta::empty())))
}
