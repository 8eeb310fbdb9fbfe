//! Domain errors

use thiserror::Error;

/// Every failure a request can end in.
///
/// The `Display` text of all variants except `Internal` is safe to show to
/// API callers. `Internal` carries the underlying cause for logging only.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Internal(format!("Database error: {}", e))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
