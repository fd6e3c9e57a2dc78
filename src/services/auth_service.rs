use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

use crate::{
    audit,
    dto::auth::{CourierLoginRequest, LoginRequest, LoginResponse, PrincipalKind, RegisterRequest},
    entity::{
        akun::{ActiveModel as AkunActive, Column as AkunCol, Entity as Akun},
        pengirim::{Column as CourierCol, Entity as Pengirim},
    },
    error::{AppError, AppResult},
    middleware::auth::issue_token,
    models::Account,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const ROLE_BUYER: &str = "pembeli";
pub const ROLE_FARMER: &str = "peternak";
pub const ROLE_COURIER: &str = "pengirim";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<Account>> {
    let RegisterRequest {
        nama,
        no_telp,
        email,
        password,
        role,
        alamat,
    } = payload;
    let (nama, no_telp, email) = (nama.trim(), no_telp.trim(), email.trim().to_lowercase());
    if nama.is_empty() || no_telp.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "nama, no_telp, email and password are required".into(),
        ));
    }
    let role = match role.as_deref().map(str::trim) {
        None | Some("") => ROLE_BUYER.to_string(),
        Some(r) if r == ROLE_BUYER || r == ROLE_FARMER => r.to_string(),
        Some(other) => return Err(AppError::BadRequest(format!("Unknown role '{other}'"))),
    };

    let exist = Akun::find()
        .filter(
            Condition::any()
                .add(AkunCol::NoTelp.eq(no_telp))
                .add(AkunCol::Email.eq(email.as_str())),
        )
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict(
            "Phone number or email is already registered".into(),
        ));
    }

    let account = AkunActive {
        id: NotSet,
        nama: Set(nama.to_string()),
        no_telp: Set(no_telp.to_string()),
        email: Set(email),
        role: Set(role),
        password_hash: Set(hash_password(&password)?),
        alamat: Set(alamat),
        lon: Set(None),
        lat: Set(None),
        image_url: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        &account.no_telp,
        "user_register",
        "akun",
        serde_json::json!({ "user_id": account.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", account.into(), Some(Meta::empty())))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let account = Akun::find()
        .filter(AkunCol::Email.eq(email.trim().to_lowercase()))
        .one(&state.orm)
        .await?;

    let account = match account {
        Some(a) => a,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };
    if !verify_password(&password, &account.password_hash)? {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let token = issue_token(
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
        &account.no_telp,
        PrincipalKind::Akun,
        &account.role,
    )?;

    audit::record(
        &state.pool,
        &account.no_telp,
        "user_login",
        "akun",
        serde_json::json!({ "user_id": account.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
            nama: account.nama,
            role: account.role,
            kind: PrincipalKind::Akun,
        },
        Some(Meta::empty()),
    ))
}

pub async fn login_courier(
    state: &AppState,
    payload: CourierLoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let CourierLoginRequest { no_telp, password } = payload;
    let courier = Pengirim::find()
        .filter(CourierCol::NoTelp.eq(no_telp.trim()))
        .one(&state.orm)
        .await?;

    let courier = match courier {
        Some(c) => c,
        None => {
            return Err(AppError::BadRequest(
                "Invalid phone number or password".into(),
            ));
        }
    };
    if !verify_password(&password, &courier.password_hash)? {
        return Err(AppError::BadRequest(
            "Invalid phone number or password".into(),
        ));
    }

    let token = issue_token(
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
        &courier.no_telp,
        PrincipalKind::Pengirim,
        ROLE_COURIER,
    )?;

    audit::record(
        &state.pool,
        &courier.no_telp,
        "courier_login",
        "pengirim",
        serde_json::json!({ "courier_id": courier.id, "farm_id": courier.farm_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
            nama: courier.nama,
            role: ROLE_COURIER.to_string(),
            kind: PrincipalKind::Pengirim,
        },
        Some(Meta::empty()),
    ))
}
