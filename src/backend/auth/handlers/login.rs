/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * The identifier is matched against both email and username. An unknown
 * user and a wrong password both answer 400, with different messages.
 */

use axum::extract::State;
use axum::Json;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::passwords::verify_password;
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;

/// Verify credentials and issue a token
///
/// # Example Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "user": { "id": "...", "username": "alice", "role": "user", ... }
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let identifier = require_text("emailOrUsername", request.email_or_username.as_deref())?;
    // Checked for presence only, the password itself is used untrimmed
    require_text("password", request.password.as_deref())?;
    let password = request.password.unwrap_or_default();

    let user = match state.store.user_by_login(identifier).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login for unknown user: {}", identifier);
            return Err(BackendError::validation("User not found"));
        }
    };

    if !verify_password(password, user.password_hash.clone()).await? {
        tracing::warn!("Wrong password for user: {}", user.username);
        return Err(BackendError::validation("Incorrect password"));
    }

    let token = state.tokens.issue(user.id)?;
    tracing::info!("User logged in: {} ({})", user.username, user.id);

    Ok(Json(AuthResponse { token, user }))
}
