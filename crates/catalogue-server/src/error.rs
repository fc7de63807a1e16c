//! Server error types
//!
//! `CatalogueError` is what every command and query returns. It maps onto the
//! standard `ErrorResponse` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::api::response::ErrorResponse;
use crate::audit::AuditError;
use crate::domain::validation::FieldError;
use crate::ids::IdError;
use crate::store::StoreError;

/// Result type alias for catalogue operations
pub type CatalogueResult<T> = Result<T, CatalogueError>;

/// Errors raised by catalogue operations
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InsufficientAuthentication(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogueError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::InsufficientAuthentication(msg.into())
    }

    /// Status code and machine readable code of this error
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            CatalogueError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            CatalogueError::AlreadyExists(_) | CatalogueError::Conflict(_) => {
                (StatusCode::CONFLICT, "CONFLICT")
            },
            CatalogueError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            CatalogueError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            CatalogueError::InsufficientAuthentication(_) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            },
            CatalogueError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
            CatalogueError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            CatalogueError::Analytics(_) => (StatusCode::BAD_GATEWAY, "ANALYTICS_ERROR"),
            CatalogueError::Store(_) | CatalogueError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            },
        }
    }
}

impl From<StoreError> for CatalogueError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => CatalogueError::NotFound(err.to_string()),
            StoreError::AlreadyExists { .. } => CatalogueError::AlreadyExists(err.to_string()),
            other => CatalogueError::Store(other),
        }
    }
}

impl From<AuditError> for CatalogueError {
    fn from(err: AuditError) -> Self {
        CatalogueError::Internal(err.to_string())
    }
}

impl From<FieldError> for CatalogueError {
    fn from(err: FieldError) -> Self {
        CatalogueError::Validation(err.to_string())
    }
}

impl From<IdError> for CatalogueError {
    fn from(err: IdError) -> Self {
        CatalogueError::Validation(err.to_string())
    }
}

impl IntoResponse for CatalogueError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        let message = match &self {
            CatalogueError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                "A storage error occurred".to_string()
            },
            CatalogueError::Analytics(err) => {
                tracing::warn!(error = %err, "Analytics error");
                err.to_string()
            },
            CatalogueError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            },
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
