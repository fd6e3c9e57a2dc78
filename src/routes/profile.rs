use axum::{
    Router,
    extract::State,
    routing::{get, put},
};

use crate::{
    dto::profile::{ProfileDeleted, ProfileImageForm, UpdateProfileRequest},
    error::{AppError, AppResult},
    middleware::auth::Principal,
    models::Account,
    response::ApiResponse,
    routes::{
        extract::{Json, Multipart},
        multipart::read_form,
    },
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route(
            "/image",
            put(upload_image).delete(remove_image),
        )
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Caller's account", body = ApiResponse<Account>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<Account>>> {
    Ok(Json(profile_service::get_profile(&state, &principal).await?))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<Account>),
        (status = 400, description = "Nothing to update or invalid location"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    Ok(Json(
        profile_service::update_profile(&state, &principal, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/profile",
    responses(
        (status = 200, description = "Account deleted", body = ApiResponse<ProfileDeleted>),
        (status = 409, description = "Account still has orders")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<ProfileDeleted>>> {
    Ok(Json(profile_service::delete_profile(&state, &principal).await?))
}

#[utoipa::path(
    put,
    path = "/api/profile/image",
    request_body(content = ProfileImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile image stored", body = ApiResponse<Account>),
        (status = 400, description = "Missing image or unsupported extension"),
        (status = 502, description = "Object storage failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    principal: Principal,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Account>>> {
    let form = read_form(multipart, "image").await?;
    let image = form
        .file
        .ok_or_else(|| AppError::BadRequest("image is required".into()))?;
    Ok(Json(
        profile_service::upload_profile_image(&state, &principal, image).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/profile/image",
    responses(
        (status = 200, description = "Profile image cleared", body = ApiResponse<Account>),
        (status = 404, description = "No profile image set")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn remove_image(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<Account>>> {
    Ok(Json(profile_service::remove_profile_image(&state, &principal).await?))
}
