/**
 * Register Handler
 *
 * POST /api/auth/register
 *
 * # Registration Process
 *
 * 1. Require username, email, password and full name
 * 2. Hash the password with bcrypt (work factor from configuration)
 * 3. Insert the user; any taken unique field is a conflict
 *
 * Emails listed in `ADMIN_EMAILS` register with the `admin` role. That is
 * the only way the first admin comes to exist; admins then grant roles
 * through `PUT /api/auth/profile/role`.
 *
 * No token is issued here, the client logs in afterwards.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::backend::auth::handlers::types::{RegisterRequest, UserMessage};
use crate::backend::auth::passwords::hash_password;
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;
use crate::shared::users::NewUser;

/// Register a new account
///
/// # Errors
///
/// * `400 Bad Request` - A field is missing or blank, or the username, email
///   or full name is already taken
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserMessage>), BackendError> {
    let username = require_text("username", request.username.as_deref())?.to_string();
    let email = require_text("email", request.email.as_deref())?.to_string();
    let full_name = require_text("fullName", request.full_name.as_deref())?.to_string();
    // Checked for presence only, the password itself is used untrimmed
    require_text("password", request.password.as_deref())?;
    let password = request.password.unwrap_or_default();

    tracing::info!("Register request for username: {}, email: {}", username, email);

    let password_hash = hash_password(password, state.bcrypt_cost).await?;
    let role = state.role_for_email(&email);

    let user = state
        .store
        .create_user(NewUser {
            username,
            full_name,
            email,
            password_hash,
            role,
        })
        .await?;

    tracing::info!(
        "User registered: {} ({}) as {}",
        user.username,
        user.id,
        user.role.as_str()
    );

    Ok((
        StatusCode::CREATED,
        Json(UserMessage {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}
