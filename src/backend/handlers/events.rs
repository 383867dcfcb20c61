/**
 * Event Handlers
 *
 * `/api/events`: CRUD, participation, likes, comments, related events and
 * the exact-match filters.
 *
 * # Filters
 *
 * - `GET /api/events/date?date=2025-06-01` - same calendar day (UTC)
 * - `GET /api/events/location?location=Madrid` - location string, or any
 *   string field of a location object
 * - `GET /api/events/title?title=...`
 * - `GET /api/events/description?description=...`
 *
 * # Participation
 *
 * Joining twice is a conflict and leaving without having joined is
 * rejected; both answer 400.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::handlers::comments::{append_comment, CommentRequest};
use crate::backend::handlers::users::MessageResponse;
use crate::backend::middleware::{ApiJson, ApiPath, ApiQuery, AuthUser, MediaForm};
use crate::backend::populate::{event_view, event_views};
use crate::backend::server::state::AppState;
use crate::shared::content::{
    parse_date, parse_day, ContentKind, Event, EventFilter, EventUpdate, EventView, NewEvent,
};
use crate::shared::error::require_text;
use crate::shared::forms::{opt_f64, opt_json, opt_text};
use crate::shared::SharedError;

/// Event fields, as JSON or multipart text
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    #[serde(default, deserialize_with = "opt_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_json")]
    pub location: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "opt_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub date: Option<String>,
    /// Already hosted image URL
    #[serde(default, deserialize_with = "opt_text")]
    pub image: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct EventQuery {
    pub date: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct EventMessage {
    pub message: String,
    pub event: Event,
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, SharedError> {
    value.ok_or_else(|| SharedError::validation(field, "is required"))
}

pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    form: MediaForm<EventForm>,
) -> Result<(StatusCode, Json<Event>), BackendError> {
    let fields = form.fields;
    let mut new_event = NewEvent {
        title: required("title", fields.title)?,
        description: required("description", fields.description)?,
        location: required("location", fields.location)?,
        latitude: required("latitude", fields.latitude)?,
        longitude: required("longitude", fields.longitude)?,
        category: required("category", fields.category)?,
        date: parse_date("date", &required("date", fields.date)?)?,
        image: fields.image,
        creator: auth.id,
    };
    // Upload only once the fields are known to be valid
    let uploaded = state.media.store_optional(form.file).await?;
    if let Some(url) = &uploaded {
        new_event.image = Some(url.clone());
    }

    let result = state.store.create_event(new_event).await;
    let event = state.media.settle(uploaded.as_deref(), result).await?;

    tracing::info!("Event {} ({}) created by {}", event.id, event.title, auth.id);
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let events = state.store.list_events().await?;
    Ok(Json(event_views(&state.store, events).await?))
}

pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<EventView>, BackendError> {
    let event = state
        .store
        .event_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found(ContentKind::Event.not_found_message()))?;
    Ok(Json(event_view(&state.store, event).await?))
}

pub async fn events_by_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let events = state.store.events_by_creator(user_id).await?;
    Ok(Json(event_views(&state.store, events).await?))
}

/// Partial edit; blank or absent fields keep their stored value
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    form: MediaForm<EventForm>,
) -> Result<Json<Event>, BackendError> {
    let fields = form.fields;
    let date = match fields.date.as_deref() {
        Some(date) => Some(parse_date("date", date)?),
        None => None,
    };
    if state.store.event_by_id(id).await?.is_none() {
        return Err(BackendError::not_found(ContentKind::Event.not_found_message()));
    }
    let uploaded = state.media.store_optional(form.file).await?;

    let result = state
        .store
        .update_event(
            id,
            EventUpdate {
                title: fields.title,
                description: fields.description,
                location: fields.location,
                latitude: fields.latitude,
                longitude: fields.longitude,
                category: fields.category,
                date,
                image: uploaded.clone().or(fields.image),
            },
        )
        .await;
    let event = state.media.settle(uploaded.as_deref(), result).await?;

    tracing::info!("Event {} updated by {}", event.id, auth.id);
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    state.store.delete_event(id).await?;
    tracing::info!("Event {} deleted by {}", id, auth.id);
    Ok(MessageResponse::new("Event deleted successfully"))
}

pub async fn related_events(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let events = state.store.related_events(id).await?;
    Ok(Json(event_views(&state.store, events).await?))
}

pub async fn join_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<EventMessage>, BackendError> {
    let event = state.store.join_event(id, auth.id).await?;
    tracing::info!("{} joined event {}", auth.id, id);
    Ok(Json(EventMessage {
        message: "Joined the event successfully".to_string(),
        event,
    }))
}

pub async fn leave_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<EventMessage>, BackendError> {
    let event = state.store.leave_event(id, auth.id).await?;
    tracing::info!("{} left event {}", auth.id, id);
    Ok(Json(EventMessage {
        message: "You have left the event".to_string(),
        event,
    }))
}

pub async fn like_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Event>, BackendError> {
    let event = state.store.toggle_event_like(id, auth.id).await?;
    tracing::debug!("Event {} now has {} likes", event.id, event.likes.len());
    Ok(Json(event))
}

pub async fn comment_on_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), BackendError> {
    append_comment(&state, ContentKind::Event, id, &auth, request).await
}

async fn filtered(state: &AppState, filter: EventFilter) -> Result<Json<Vec<EventView>>, BackendError> {
    let events = state.store.filter_events(&filter).await?;
    Ok(Json(event_views(&state.store, events).await?))
}

pub async fn events_by_date(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventQuery>,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let day = parse_day("date", require_text("date", query.date.as_deref())?)?;
    filtered(&state, EventFilter::Date(day)).await
}

pub async fn events_by_location(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventQuery>,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let location = require_text("location", query.location.as_deref())?;
    filtered(&state, EventFilter::Location(location.to_string())).await
}

pub async fn events_by_title(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventQuery>,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let title = require_text("title", query.title.as_deref())?;
    filtered(&state, EventFilter::Title(title.to_string())).await
}

pub async fn events_by_description(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventQuery>,
) -> Result<Json<Vec<EventView>>, BackendError> {
    let description = require_text("description", query.description.as_deref())?;
    filtered(&state, EventFilter::Description(description.to_string())).await
}
