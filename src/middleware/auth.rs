use axum::{extract::FromRequestParts, http::header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    dto::auth::{Claims, PrincipalKind},
    error::AppError,
    state::AppState,
};

/// Authenticated caller. `subject` is the phone number the token was issued to.
///
/// The token's `role` claim is not carried here: it goes stale when the role
/// changes, so services read the stored account instead.
#[derive(Debug, Clone)]
pub struct Principal {
    pub subject: String,
    pub kind: PrincipalKind,
}

impl Principal {
    pub fn is_courier(&self) -> bool {
        self.kind == PrincipalKind::Pengirim
    }
}

pub fn ensure_account(principal: &Principal) -> Result<(), AppError> {
    if principal.kind != PrincipalKind::Akun {
        return Err(AppError::Unauthorized(
            "This action requires an account login.".into(),
        ));
    }
    Ok(())
}

pub fn ensure_courier(principal: &Principal) -> Result<(), AppError> {
    if principal.kind != PrincipalKind::Pengirim {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn issue_token(
    secret: &str,
    ttl_hours: i64,
    subject: &str,
    kind: PrincipalKind,
    role: &str,
) -> Result<String, AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: subject.to_string(),
        kind,
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Principal, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| {
        AppError::Unauthorized("Invalid or expired token. Please log in again.".into())
    })?;

    if decoded.claims.sub.is_empty() {
        return Err(AppError::Unauthorized("Token has no subject.".into()));
    }

    Ok(Principal {
        subject: decoded.claims.sub,
        kind: decoded.claims.kind,
    })
}

fn bearer_token(parts: &axum::http::request::Parts) -> Result<String, AppError> {
    if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;
        return Ok(token.trim().to_string());
    }

    // Older clients send the raw token in a `login` header.
    parts
        .headers
        .get("login")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        verify_token(&state.config.jwt_secret, &token)
    }
}
