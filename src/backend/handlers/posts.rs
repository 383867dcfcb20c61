/**
 * Post Handlers
 *
 * `/api/posts`. Reads are public; writes take an `AuthUser`. Create and
 * update accept JSON or multipart with an optional `media` file, whose
 * stored URL takes precedence over a `media` text field.
 *
 * List and single reads are populated (creator, tagged users, comment
 * authors). The per-user list, likes and edits return stored records.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::handlers::comments::{append_comment, CommentRequest};
use crate::backend::handlers::users::MessageResponse;
use crate::backend::middleware::{ApiJson, ApiPath, AuthUser, MediaForm};
use crate::backend::populate::{post_view, post_views};
use crate::backend::server::state::AppState;
use crate::shared::content::{ContentKind, NewPost, Post, PostUpdate, PostView};
use crate::shared::forms::{opt_text, opt_uuid_list};

/// Post fields, as JSON or multipart text
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PostForm {
    #[serde(default, deserialize_with = "opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "opt_uuid_list")]
    pub tagged_users: Option<Vec<Uuid>>,
    /// Already hosted media URL
    #[serde(default, deserialize_with = "opt_text")]
    pub media: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct PostMessage {
    pub message: String,
    pub post: Post,
}

pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    form: MediaForm<PostForm>,
) -> Result<(StatusCode, Json<PostMessage>), BackendError> {
    let fields = form.fields;
    let uploaded = state.media.store_optional(form.file).await?;

    let result = state
        .store
        .create_post(NewPost {
            description: fields.description,
            location: fields.location,
            category: fields.category,
            tagged_users: fields.tagged_users.unwrap_or_default(),
            media: uploaded.clone().or(fields.media),
            creator: auth.id,
        })
        .await;
    let post = state.media.settle(uploaded.as_deref(), result).await?;

    tracing::info!("Post {} created by {}", post.id, auth.id);
    Ok((
        StatusCode::CREATED,
        Json(PostMessage {
            message: "Post created successfully".to_string(),
            post,
        }),
    ))
}

/// All posts, newest first
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostView>>, BackendError> {
    let posts = state.store.list_posts().await?;
    Ok(Json(post_views(&state.store, posts).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PostView>, BackendError> {
    let post = state
        .store
        .post_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found(ContentKind::Post.not_found_message()))?;
    Ok(Json(post_view(&state.store, post).await?))
}

pub async fn posts_by_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Post>>, BackendError> {
    Ok(Json(state.store.posts_by_creator(user_id).await?))
}

/// Edit a post; fields left out keep their stored value
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    form: MediaForm<PostForm>,
) -> Result<Json<PostMessage>, BackendError> {
    let fields = form.fields;
    if state.store.post_by_id(id).await?.is_none() {
        return Err(BackendError::not_found(ContentKind::Post.not_found_message()));
    }
    let uploaded = state.media.store_optional(form.file).await?;

    let result = state
        .store
        .update_post(
            id,
            PostUpdate {
                description: fields.description,
                location: fields.location,
                category: fields.category,
                tagged_users: fields.tagged_users,
                media: uploaded.clone().or(fields.media),
            },
        )
        .await;
    let post = state.media.settle(uploaded.as_deref(), result).await?;

    tracing::info!("Post {} updated by {}", post.id, auth.id);
    Ok(Json(PostMessage {
        message: "Post updated successfully".to_string(),
        post,
    }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    state.store.delete_post(id).await?;
    tracing::info!("Post {} deleted by {}", id, auth.id);
    Ok(MessageResponse::new("Post deleted successfully"))
}

/// Up to five other posts in the same category
pub async fn related_posts(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<PostView>>, BackendError> {
    let posts = state.store.related_posts(id).await?;
    Ok(Json(post_views(&state.store, posts).await?))
}

/// Like the post, or remove the caller's like
pub async fn like_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Post>, BackendError> {
    let post = state.store.toggle_post_like(id, auth.id).await?;
    tracing::debug!("Post {} now has {} likes", post.id, post.likes.len());
    Ok(Json(post))
}

pub async fn comment_on_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), BackendError> {
    append_comment(&state, ContentKind::Post, id, &auth, request).await
}
