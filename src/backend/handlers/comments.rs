//! Comment append, shared by posts and events

use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::populate::comment_views;
use crate::backend::server::state::AppState;
use crate::shared::content::{Comment, ContentKind};
use crate::shared::error::require_text;

#[derive(Deserialize, Debug, Default)]
pub struct CommentRequest {
    pub content: Option<String>,
}

/// Append a comment by the caller and answer `{ postId | eventId, comments }`
///
/// Blank content is rejected before the store is touched.
pub async fn append_comment(
    state: &AppState,
    kind: ContentKind,
    item: Uuid,
    auth: &AuthUser,
    request: CommentRequest,
) -> Result<(StatusCode, Json<serde_json::Value>), BackendError> {
    let content = require_text("content", request.content.as_deref())?;

    let comments = state
        .store
        .add_comment(kind, item, Comment::new(auth.id, content))
        .await?;
    tracing::info!("{} commented on {} {}", auth.id, kind, item);

    let comments = serde_json::to_value(comment_views(&state.store, comments).await?)
        .map_err(|e| BackendError::internal(format!("comment serialisation: {}", e)))?;
    let mut body = serde_json::Map::new();
    body.insert(kind.id_field().to_string(), serde_json::json!(item));
    body.insert("comments".to_string(), comments);

    Ok((StatusCode::CREATED, Json(serde_json::Value::Object(body))))
}
