//! Error handling

use axum::{
    extract::rejection::QueryRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use phishguard_core::GrcError;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Resource errors
    #[error("{0}")]
    NotFound(String),

    // Validation errors
    #[error("{0}")]
    ValidationError(String),

    // Generic errors
    #[error("{0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Register/CSV problems are the caller's fault; everything else is ours
impl From<GrcError> for AppError {
    fn from(err: GrcError) -> Self {
        match err {
            GrcError::Csv(_)
            | GrcError::MissingColumns { .. }
            | GrcError::InvalidRegister { .. } => AppError::ValidationError(err.to_string()),
            GrcError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                AppError::NotFound(e.to_string())
            }
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::ValidationError(err.body_text())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}
