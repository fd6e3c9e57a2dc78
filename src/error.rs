use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::SqlErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("You are not allowed to perform this action")]
    Forbidden,

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Upload failed: {0}")]
    Storage(String),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }

    /// Message for database errors raised by a unique or foreign-key constraint.
    fn constraint_conflict(&self) -> Option<&'static str> {
        match self {
            AppError::DbError(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Some("Resource already exists")
            }
            AppError::DbError(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Some("Resource is still referenced")
            }
            AppError::OrmError(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Some("Resource already exists"),
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    Some("Resource is still referenced")
                }
                _ => None,
            },
            _ => None,
        }
    }

    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        if self.constraint_conflict().is_some() {
            return (StatusCode::CONFLICT, "Conflict");
        }
        match self {
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            AppError::DbError(_) | AppError::OrmError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AppError::Storage(_) => (StatusCode::BAD_GATEWAY, "Upload error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        }
    }
}

macro_rules! bad_request_from_rejection {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    AppError::BadRequest(rejection.body_text())
                }
            }
        )*
    };
}

bad_request_from_rejection!(JsonRejection, QueryRejection, PathRejection, MultipartRejection);

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if let Some(conflict) = self.constraint_conflict() {
            tracing::warn!(error = %self, conflict, "constraint violation");
            conflict.to_string()
        } else {
            match &self {
                AppError::DbError(err) => {
                    tracing::error!(error = %err, "database error");
                    "Failed to process request.".to_string()
                }
                AppError::OrmError(err) => {
                    tracing::error!(error = %err, "orm error");
                    "Failed to process request.".to_string()
                }
                AppError::Internal(err) => {
                    tracing::error!(error = %err, "internal error");
                    "Failed to process request.".to_string()
                }
                AppError::Storage(reason) => {
                    tracing::error!(reason = %reason, "object storage error");
                    self.to_string()
                }
                _ => self.to_string(),
            }
        };

        let body = ErrorBody {
            error: code.to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
