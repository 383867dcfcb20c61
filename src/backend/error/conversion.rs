/**
 * Error Conversion
 *
 * `BackendError` implements `IntoResponse`, so handlers return it directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "message": "Post not found",
 *   "status": 404
 * }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            BackendError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            other => tracing::warn!("Request rejected ({}): {}", status.as_u16(), other),
        }

        let body = serde_json::json!({
            "message": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
