//! Messaging Handlers
//!
//! Direct conversations between two users (`/api/messages`).
//!
//! A conversation is identified by its canonical participant pair, so
//! `POST /api/messages/conversations` with (A, B) and with (B, A) return the
//! same record. Messages are appended to an existing conversation and listed
//! oldest first.

use std::collections::HashSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, ApiPath, AuthUser};
use crate::backend::populate::users_in_order;
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;
use crate::shared::messaging::{CanonicalPair, Conversation, DirectMessage, NewDirectMessage};
use crate::shared::users::User;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRequest {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: Uuid,
    pub sender: Uuid,
    pub receiver: Uuid,
    pub content: Option<String>,
}

/// Find or create the conversation between two users
///
/// The caller must be one of the two. The same user twice is rejected.
pub async fn get_or_create_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<ConversationRequest>,
) -> Result<Json<Conversation>, BackendError> {
    let pair = CanonicalPair::new(request.sender_id, request.receiver_id)?;
    let Some(partner) = pair.other(auth.id) else {
        tracing::warn!("{} tried to open a conversation for others", auth.id);
        return Err(BackendError::unauthorized(
            "You can only open conversations you take part in",
        ));
    };
    if state.store.user_by_id(partner).await?.is_none() {
        return Err(BackendError::not_found("User not found"));
    }

    let conversation = state.store.get_or_create_conversation(pair).await?;
    tracing::info!(
        "Conversation {} between {} and {}",
        conversation.id,
        pair.first(),
        pair.second()
    );
    Ok(Json(conversation))
}

/// Every user `userId` has a conversation with, each once
pub async fn conversation_partners(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<User>>, BackendError> {
    let conversations = state.store.conversations_for_user(user_id).await?;

    let mut seen = HashSet::new();
    let partners: Vec<Uuid> = conversations
        .iter()
        .filter_map(|conversation| conversation.participants.other(user_id))
        .filter(|partner| seen.insert(*partner))
        .collect();

    Ok(Json(users_in_order(&state.store, &partners).await?))
}

pub async fn get_conversation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Conversation>, BackendError> {
    state
        .store
        .conversation_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found("Conversation not found"))
}

/// Messages of a conversation, oldest first
pub async fn messages_by_conversation(
    State(state): State<AppState>,
    ApiPath(conversation_id): ApiPath<Uuid>,
) -> Result<Json<Vec<DirectMessage>>, BackendError> {
    if state.store.conversation_by_id(conversation_id).await?.is_none() {
        return Err(BackendError::not_found("Conversation not found"));
    }
    Ok(Json(state.store.messages_by_conversation(conversation_id).await?))
}

/// Append a message; the caller must be the sender
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<DirectMessage>), BackendError> {
    let content = require_text("content", request.content.as_deref())?.to_string();
    if request.sender != auth.id {
        tracing::warn!("{} tried to send a message as {}", auth.id, request.sender);
        return Err(BackendError::unauthorized("You can only send messages as yourself"));
    }

    let message = state
        .store
        .send_message(NewDirectMessage {
            conversation_id: request.conversation_id,
            sender: request.sender,
            receiver: request.receiver,
            content,
        })
        .await?;

    tracing::info!(
        "Message {} in conversation {}: {}",
        message.id,
        message.conversation_id,
        message.preview(40)
    );
    Ok((StatusCode::CREATED, Json(message)))
}
