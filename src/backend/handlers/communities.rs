/**
 * Community Handlers
 *
 * `/api/communities`: CRUD, membership and the community chat.
 *
 * Writes identify the acting user by token. The creator becomes the first
 * member, joining twice is a successful no-op, and leaving a community the
 * caller is not a member of is rejected.
 *
 * Community media must be a jpg, jpeg, png or gif file.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::handlers::users::MessageResponse;
use crate::backend::middleware::{ApiJson, ApiPath, AuthUser, MediaForm, UploadedFile};
use crate::backend::populate::{community_view, community_views, users_in_order};
use crate::backend::server::state::AppState;
use crate::shared::community::{
    is_allowed_media, ChatMessage, Community, CommunityUpdate, CommunityView, NewCommunity,
};
use crate::shared::error::require_text;
use crate::shared::forms::opt_text;
use crate::shared::users::User;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommunityForm {
    #[serde(default, deserialize_with = "opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    pub community_id: Uuid,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub community_id: Uuid,
    pub content: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct CommunityMessage {
    pub message: String,
    pub community: Community,
}

fn name_and_description(form: CommunityForm) -> Result<(String, String), BackendError> {
    match (form.name, form.description) {
        (Some(name), Some(description)) => {
            Ok((name.trim().to_string(), description.trim().to_string()))
        }
        _ => Err(BackendError::validation("Missing required fields")),
    }
}

fn check_media(file: &Option<UploadedFile>) -> Result<(), BackendError> {
    match file {
        Some(file) if !is_allowed_media(&file.file_name) => {
            tracing::warn!("Rejected community media {}", file.file_name);
            Err(BackendError::validation("Invalid media file"))
        }
        _ => Ok(()),
    }
}

fn community_not_found() -> BackendError {
    BackendError::not_found("Community not found")
}

pub async fn create_community(
    State(state): State<AppState>,
    auth: AuthUser,
    form: MediaForm<CommunityForm>,
) -> Result<(StatusCode, Json<Community>), BackendError> {
    let (name, description) = name_and_description(form.fields)?;
    check_media(&form.file)?;
    let media = state.media.store_optional(form.file).await?;

    let result = state
        .store
        .create_community(NewCommunity {
            name,
            description,
            media: media.clone(),
            creator: auth.id,
        })
        .await;
    let community = state.media.settle(media.as_deref(), result).await?;

    tracing::info!("Community {} ({}) created by {}", community.id, community.name, auth.id);
    Ok((StatusCode::CREATED, Json(community)))
}

pub async fn list_communities(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommunityView>>, BackendError> {
    let communities = state.store.list_communities().await?;
    Ok(Json(community_views(&state.store, communities).await?))
}

/// Community with members resolved and its chat attached
pub async fn get_community(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CommunityView>, BackendError> {
    let community = state
        .store
        .community_by_id(id)
        .await?
        .ok_or_else(community_not_found)?;
    let chat = state.store.chat_by_community(id).await?;
    Ok(Json(community_view(&state.store, community, chat).await?))
}

/// Communities created by `userId`
pub async fn communities_by_creator(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Community>>, BackendError> {
    Ok(Json(state.store.communities_by_creator(user_id).await?))
}

/// Communities the caller is a member of
pub async fn my_communities(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Community>>, BackendError> {
    Ok(Json(state.store.communities_by_member(auth.id).await?))
}

/// Communities the caller created
pub async fn my_created_communities(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Community>>, BackendError> {
    Ok(Json(state.store.communities_by_creator(auth.id).await?))
}

pub async fn update_community(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    form: MediaForm<CommunityForm>,
) -> Result<Json<Community>, BackendError> {
    let (name, description) = name_and_description(form.fields)?;
    check_media(&form.file)?;
    if state.store.community_by_id(id).await?.is_none() {
        return Err(community_not_found());
    }
    let media = state.media.store_optional(form.file).await?;

    let result = state
        .store
        .update_community(
            id,
            CommunityUpdate {
                name,
                description,
                media: media.clone(),
            },
        )
        .await;
    let community = state.media.settle(media.as_deref(), result).await?;

    tracing::info!("Community {} updated by {}", community.id, auth.id);
    Ok(Json(community))
}

/// Delete a community together with its chat
pub async fn delete_community(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    state.store.delete_community(id).await?;
    tracing::info!("Community {} deleted by {}", id, auth.id);
    Ok(MessageResponse::new("Community deleted successfully"))
}

pub async fn join_community(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<MembershipRequest>,
) -> Result<Json<CommunityMessage>, BackendError> {
    let outcome = state.store.join_community(request.community_id, auth.id).await?;
    let message = if outcome.joined {
        tracing::info!("{} joined community {}", auth.id, request.community_id);
        "User joined successfully"
    } else {
        "User already a member"
    };
    Ok(Json(CommunityMessage {
        message: message.to_string(),
        community: outcome.community,
    }))
}

pub async fn leave_community(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<MembershipRequest>,
) -> Result<Json<Community>, BackendError> {
    let community = state.store.leave_community(request.community_id, auth.id).await?;
    tracing::info!("{} left community {}", auth.id, request.community_id);
    Ok(Json(community))
}

/// Append a message from the caller to the community chat
pub async fn send_chat_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<ChatMessageRequest>,
) -> Result<Json<ChatMessage>, BackendError> {
    let content = require_text("content", request.content.as_deref())?;
    let message = state
        .store
        .append_chat_message(ChatMessage::new(request.community_id, auth.id, content))
        .await?;
    tracing::info!("{} wrote in community {}", auth.id, request.community_id);
    Ok(Json(message))
}

/// Chat messages in send order
pub async fn chat_messages(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, BackendError> {
    let chat = state
        .store
        .chat_by_community(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chat not found"))?;
    Ok(Json(chat.messages))
}

pub async fn chat_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Uuid>, BackendError> {
    let chat = state
        .store
        .chat_by_community(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chat not found"))?;
    Ok(Json(chat.id))
}

pub async fn members(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<User>>, BackendError> {
    let community = state
        .store
        .community_by_id(id)
        .await?
        .ok_or_else(community_not_found)?;
    Ok(Json(users_in_order(&state.store, &community.members).await?))
}
