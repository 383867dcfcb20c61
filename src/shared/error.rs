//! Shared Error Types
//!
//! Errors that describe bad input independent of any transport. The backend
//! wraps them in `BackendError` and answers with 400.
//!
//! # Usage
//!
//! ```rust
//! use ridehub::shared::error::{require_text, SharedError};
//!
//! let error = SharedError::validation("content", "must not be empty");
//! assert!(require_text("content", Some("  ")).is_err());
//! ```
use thiserror::Error;

/// Shared error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Require a present, non-blank text field and return it trimmed.
pub fn require_text<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, SharedError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        Some(_) => Err(SharedError::validation(field, "must not be empty")),
        None => Err(SharedError::validation(field, "is required")),
    }
}
