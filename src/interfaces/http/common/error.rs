//! JSON error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
    pub status_code: u16,
}

impl ErrorBody {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            status_code: status.as_u16(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::BAD_REQUEST,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match self {
            DomainError::Internal(message) => {
                error!(error = %message, "Request failed");
                "Internal server error".to_string()
            }
            DomainError::NotFound(m)
            | DomainError::Conflict(m)
            | DomainError::Forbidden(m)
            | DomainError::Validation(m) => m,
        };
        ErrorBody::new(status, detail).into_response_with(status)
    }
}

pub type ApiResult<T> = Result<T, DomainError>;
