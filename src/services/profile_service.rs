use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};

use crate::{
    audit,
    dto::profile::{ProfileDeleted, UpdateProfileRequest},
    entity::akun::{ActiveModel as AkunActive, Entity as Akun},
    error::{AppError, AppResult},
    middleware::auth::Principal,
    models::Account,
    response::{ApiResponse, Meta},
    services::{identity::account_for, non_blank},
    state::AppState,
    storage::ImageUpload,
};

pub async fn get_profile(state: &AppState, principal: &Principal) -> AppResult<ApiResponse<Account>> {
    let account = account_for(&state.orm, principal).await?;
    Ok(ApiResponse::success("Profile", account.into(), Some(Meta::empty())))
}

pub async fn update_profile(
    state: &AppState,
    principal: &Principal,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<Account>> {
    let account = account_for(&state.orm, principal).await?;
    if payload.location.is_some_and(|p| !p.is_valid()) {
        return Err(AppError::BadRequest("location is out of range".into()));
    }

    let nama = non_blank(payload.nama);
    let email = non_blank(payload.email).map(|e| e.to_lowercase());
    let alamat = non_blank(payload.alamat);
    if nama.is_none() && email.is_none() && alamat.is_none() && payload.location.is_none() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let mut active: AkunActive = account.into();
    if let Some(nama) = nama {
        active.nama = Set(nama);
    }
    if let Some(email) = email {
        active.email = Set(email);
    }
    if let Some(alamat) = alamat {
        active.alamat = Set(Some(alamat));
    }
    if let Some(point) = payload.location {
        active.lon = Set(Some(point.lon));
        active.lat = Set(Some(point.lat));
    }
    active.updated_at = Set(Utc::now().into());
    let account = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "profile_update",
        "akun",
        serde_json::json!({ "account_id": account.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Profile updated successfully",
        account.into(),
        Some(Meta::empty()),
    ))
}

/// Remove the caller's account together with its farm, products and couriers.
/// Accounts with invoices, or whose products were ordered, stay.
pub async fn delete_profile(
    state: &AppState,
    principal: &Principal,
) -> AppResult<ApiResponse<ProfileDeleted>> {
    let txn = state.orm.begin().await?;
    let account = account_for(&txn, principal).await?;
    Akun::delete_by_id(account.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(account_id = account.id, "account deleted");
    audit::record(
        &state.pool,
        &principal.subject,
        "profile_delete",
        "akun",
        serde_json::json!({ "account_id": account.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Profile deleted successfully",
        ProfileDeleted { id: account.id },
        Some(Meta::empty()),
    ))
}

pub async fn upload_profile_image(
    state: &AppState,
    principal: &Principal,
    image: ImageUpload,
) -> AppResult<ApiResponse<Account>> {
    let account = account_for(&state.orm, principal).await?;
    let path = image.hashed_name()?;

    let github = &state.config.github;
    let url = state
        .storage
        .upload(image.content, &github.org, &github.profile_repo, &path)
        .await?;

    let mut active: AkunActive = account.into();
    active.image_url = Set(Some(url.clone()));
    active.updated_at = Set(Utc::now().into());
    let account = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "profile_image_upload",
        "akun",
        serde_json::json!({ "account_id": account.id, "url": url }),
    )
    .await;

    Ok(ApiResponse::success(
        "Profile image uploaded",
        account.into(),
        Some(Meta::empty()),
    ))
}

/// Forget the stored image URL. The object itself stays in storage.
pub async fn remove_profile_image(
    state: &AppState,
    principal: &Principal,
) -> AppResult<ApiResponse<Account>> {
    let account = account_for(&state.orm, principal).await?;
    if account.image_url.is_none() {
        return Err(AppError::not_found("Profile image"));
    }

    let mut active: AkunActive = account.into();
    active.image_url = Set(None);
    active.updated_at = Set(Utc::now().into());
    let account = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Profile image removed",
        account.into(),
        Some(Meta::empty()),
    ))
}
