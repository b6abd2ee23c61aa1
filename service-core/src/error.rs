use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::crud::{ApiResponse, CrudError};
use crate::utils::validation::field_messages;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(anyhow::Error),

    #[error("{0}")]
    NotFound(anyhow::Error),

    #[error("{0}")]
    Conflict(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) | AppError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CrudError> for AppError {
    fn from(err: CrudError) -> Self {
        match err {
            CrudError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            CrudError::NotFound(msg) => AppError::NotFound(anyhow::anyhow!(msg)),
            CrudError::Conflict(msg) => AppError::Conflict(anyhow::anyhow!(msg)),
            CrudError::Internal(err) => AppError::InternalError(err),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            AppError::ValidationError(errors) => (
                status,
                Json(ApiResponse::error_with_data(
                    "Validation errors",
                    field_messages(&errors),
                )),
            )
                .into_response(),
            AppError::BadRequest(err) | AppError::NotFound(err) | AppError::Conflict(err) => {
                (status, Json(ApiResponse::<()>::error(err.to_string()))).into_response()
            }
            other => {
                tracing::error!(error = ?other, "Request failed");
                (status, Json(ApiResponse::<()>::error(other.to_string()))).into_response()
            }
        }
    }
}
