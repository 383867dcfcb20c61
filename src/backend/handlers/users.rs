//! User Handlers
//!
//! Public user lookups and the follow graph (`/api/users`).

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiPath, AuthUser, OptionalAuthUser};
use crate::backend::populate::user_profile;
use crate::backend::server::state::AppState;
use crate::shared::users::{User, UserProfile};

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, BackendError> {
    Ok(Json(state.store.list_users().await?))
}

/// Case-insensitive partial match on usernames; no match is a 404
pub async fn search_users(
    State(state): State<AppState>,
    ApiPath(fragment): ApiPath<String>,
) -> Result<Json<Vec<User>>, BackendError> {
    let users = state.store.search_users(fragment.trim()).await?;
    if users.is_empty() {
        return Err(BackendError::not_found("No matching users found"));
    }
    Ok(Json(users))
}

/// Profile page by username; `isFollowing` is relative to the bearer, if any
pub async fn profile_by_username(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<UserProfile>, BackendError> {
    let user = state
        .store
        .user_by_username(&username)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok(Json(user_profile(&state.store, user, viewer.id()).await?))
}

pub async fn user_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserProfile>, BackendError> {
    let user = state
        .store
        .user_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok(Json(user_profile(&state.store, user, None).await?))
}

pub async fn follow(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    state.store.follow(auth.id, user_id).await?;
    tracing::info!("{} now follows {}", auth.id, user_id);
    Ok(MessageResponse::new("You are now following this user"))
}

pub async fn unfollow(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    state.store.unfollow(auth.id, user_id).await?;
    tracing::info!("{} unfollowed {}", auth.id, user_id);
    Ok(MessageResponse::new("You have unfollowed this user"))
}
