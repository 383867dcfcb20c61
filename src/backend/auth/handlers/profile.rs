/**
 * Account Handlers
 *
 * Everything under `/api/auth` that acts on an existing account:
 *
 * - `GET /api/auth/verify` and `GET /api/auth/profile` - the caller's record
 * - `GET /api/auth/users` - every account
 * - `PUT /api/auth/profile` - profile edit, optional `photo` upload
 * - `PUT /api/auth/profile/role` - role change, admins only (the first admin
 *   comes from `ADMIN_EMAILS` at registration)
 * - `DELETE /api/auth/profile/{userId}` - account deletion, self or admin
 */

use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::backend::auth::handlers::types::{
    DeletionResponse, UpdateProfileRequest, UpdateRoleRequest, UserMessage,
};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, ApiPath, AuthUser, MediaForm};
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;
use crate::shared::users::{ProfileUpdate, Role, User};

/// Return the caller when the token is valid
pub async fn verify(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}

/// The caller's own record
pub async fn get_profile(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, BackendError> {
    Ok(Json(state.store.list_users().await?))
}

/// Update the caller's profile
///
/// Username, email and full name are required. `bikeDetails`, when sent,
/// must carry brand, model, year and license plate. An uploaded `photo`
/// replaces the stored one.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    form: MediaForm<UpdateProfileRequest>,
) -> Result<Json<UserMessage>, BackendError> {
    let request = form.fields;
    let (Some(username), Some(email), Some(full_name)) =
        (request.username, request.email, request.full_name)
    else {
        return Err(BackendError::validation("Missing required fields"));
    };

    if let Some(bike) = &request.bike_details {
        if !bike.is_complete() {
            return Err(BackendError::validation("Missing bike details"));
        }
    }

    let photo = state.media.store_optional(form.file).await?;

    let result = state
        .store
        .update_profile(
            auth.id,
            ProfileUpdate {
                username: username.trim().to_string(),
                email: email.trim().to_string(),
                full_name: full_name.trim().to_string(),
                bio: request.bio,
                location: request.location,
                bike_details: request.bike_details,
                photo: photo.clone(),
            },
        )
        .await;
    let user = state.media.settle(photo.as_deref(), result).await?;

    tracing::info!("Profile updated for {}", user.id);
    Ok(Json(UserMessage {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}

/// Change the role of any user; the caller must be an admin
///
/// Only `user` and `admin` are accepted.
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<UpdateRoleRequest>,
) -> Result<Json<UserMessage>, BackendError> {
    if !auth.user.role.is_admin() {
        tracing::warn!("Non-admin {} tried to change the role of {}", auth.id, request.user_id);
        return Err(BackendError::unauthorized("Only admins can change roles"));
    }
    let role = Role::parse(require_text("role", Some(&request.role))?)?;

    let user = state.store.update_role(request.user_id, role).await?;

    tracing::info!("Role of {} set to {} by {}", user.id, user.role.as_str(), auth.id);
    Ok(Json(UserMessage {
        message: "Role updated successfully".to_string(),
        user,
    }))
}

/// Delete an account and everything it owns
///
/// Only the account holder or an admin may do this. The deletion is all or
/// nothing; the response reports how many records went with the user.
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<DeletionResponse>, BackendError> {
    if auth.id != user_id && !auth.user.role.is_admin() {
        tracing::warn!("User {} tried to delete account {}", auth.id, user_id);
        return Err(BackendError::unauthorized(
            "You can only delete your own account",
        ));
    }

    let deleted = state.store.delete_account(user_id).await?;

    tracing::info!("Account {} deleted by {}: {:?}", user_id, auth.id, deleted);
    Ok(Json(DeletionResponse {
        message: "Account deleted successfully".to_string(),
        deleted,
    }))
}
