//! Posts and events
//!
//! Both content kinds carry a like set and an ordered comment list. The
//! stored records reference users by ID; the `*View` types are the populated
//! shapes returned by read endpoints.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::users::PublicUser;

/// Which content table an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Event,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Event => "event",
        }
    }

    /// Key used for the item ID in comment responses
    pub fn id_field(&self) -> &'static str {
        match self {
            Self::Post => "postId",
            Self::Event => "eventId",
        }
    }

    pub fn not_found_message(&self) -> &'static str {
        match self {
            Self::Post => "Post not found",
            Self::Event => "Event not found",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored comment on a post or event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub author: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// New comment stamped with the current time
    pub fn new(author: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Comment with its author resolved
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    /// `None` once the author's account is gone
    pub user: Option<PublicUser>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Toggle `user` in a like set and report whether it is now present
pub fn toggle_like(likes: &mut Vec<Uuid>, user: Uuid) -> bool {
    if let Some(index) = likes.iter().position(|id| *id == user) {
        likes.remove(index);
        false
    } else {
        likes.push(user);
        true
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub tagged_users: Vec<Uuid>,
    pub media: Option<String>,
    pub creator: Uuid,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(new_post: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            description: new_post.description,
            location: new_post.location,
            category: new_post.category,
            tagged_users: new_post.tagged_users,
            media: new_post.media,
            creator: new_post.creator,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub tagged_users: Vec<Uuid>,
    pub media: Option<String>,
    pub creator: Uuid,
}

/// Post edit; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub tagged_users: Option<Vec<Uuid>>,
    pub media: Option<String>,
}

impl PostUpdate {
    pub fn apply(self, post: &mut Post) {
        if let Some(description) = self.description {
            post.description = Some(description);
        }
        if let Some(location) = self.location {
            post.location = Some(location);
        }
        if let Some(category) = self.category {
            post.category = Some(category);
        }
        if let Some(tagged) = self.tagged_users {
            post.tagged_users = tagged;
        }
        if let Some(media) = self.media {
            post.media = Some(media);
        }
        post.updated_at = Utc::now();
    }
}

/// Post with creator, tagged users and comment authors resolved
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub tagged_users: Vec<PublicUser>,
    pub media: Option<String>,
    pub creator: Option<PublicUser>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Free-form location object as sent by the client
    pub location: serde_json::Value,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub image: Option<String>,
    pub creator: Uuid,
    pub participants: Vec<Uuid>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(new_event: NewEvent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new_event.title,
            description: new_event.description,
            location: new_event.location,
            latitude: new_event.latitude,
            longitude: new_event.longitude,
            category: new_event.category,
            date: new_event.date,
            image: new_event.image,
            creator: new_event.creator,
            participants: Vec::new(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: serde_json::Value,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub image: Option<String>,
    pub creator: Uuid,
}

/// Partial event edit; absent fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<serde_json::Value>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

impl EventUpdate {
    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(latitude) = self.latitude {
            event.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            event.longitude = longitude;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(image) = self.image {
            event.image = Some(image);
        }
        event.updated_at = Utc::now();
    }
}

/// Event with creator, participants and comment authors resolved
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: serde_json::Value,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub image: Option<String>,
    pub creator: Option<PublicUser>,
    pub participants: Vec<PublicUser>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Exact-match event lookup
#[derive(Debug, Clone, PartialEq)]
pub enum EventFilter {
    /// Same calendar day (UTC)
    Date(NaiveDate),
    /// Location equal to the string, or an object holding it as a field value
    Location(String),
    Title(String),
    Description(String),
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Self::Date(day) => event.date.date_naive() == *day,
            Self::Location(location) => location_matches(&event.location, location),
            Self::Title(title) => event.title == *title,
            Self::Description(description) => event.description == *description,
        }
    }
}

fn location_matches(value: &serde_json::Value, needle: &str) -> bool {
    match value {
        serde_json::Value::String(text) => text == needle,
        serde_json::Value::Object(fields) => fields
            .values()
            .any(|field| field.as_str() == Some(needle)),
        _ => false,
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(field: &str, value: &str) -> Result<DateTime<Utc>, SharedError> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    parse_day(field, value).map(|day| day.and_time(NaiveTime::MIN).and_utc())
}

/// Parse the calendar day part of a date value
pub fn parse_day(field: &str, value: &str) -> Result<NaiveDate, SharedError> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| SharedError::validation(field, "must be a date (YYYY-MM-DD)"))
}
