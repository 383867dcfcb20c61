/**
 * Backend Error Types
 *
 * `BackendError` is the only error type handlers return. Each variant maps
 * to one HTTP status:
 *
 * - `NotFound` - 404
 * - `Validation`, `InvalidToken`, `Conflict` - 400
 * - `Unauthorized` - 401
 * - `Internal` - 500, the detail is logged and never sent to the client
 *
 * Store, shared, token and media errors convert into it with `From`, so
 * handlers can use `?` throughout.
 */

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::sessions::TokenError;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// The addressed record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Missing token, unknown user or forbidden action
    #[error("{0}")]
    Unauthorized(String),

    /// Token present but not valid
    #[error("{0}")]
    InvalidToken(String),

    /// Duplicate unique value or repeated edge
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure; the message is for logs only
    #[error("internal error: {0}")]
    Internal(String),

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::InvalidToken(_) | Self::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to return to the client
    pub fn message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::SharedError(SharedError::ValidationError { field, message }) => {
                format!("{} {}", field, message)
            }
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => Self::NotFound(message.to_string()),
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::Rejected(message) => Self::Validation(message),
            StoreError::Database(err) => Self::Internal(format!("database: {}", err)),
        }
    }
}

impl From<TokenError> for BackendError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Sign(_) => Self::Internal(err.to_string()),
            TokenError::Invalid(_) => Self::InvalidToken("Invalid token".to_string()),
        }
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for BackendError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for BackendError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for BackendError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("blocking task failed: {}", err))
    }
}
