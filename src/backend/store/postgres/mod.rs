//! PostgreSQL Backend
//!
//! One file per aggregate. Every function takes the pool and returns
//! `StoreError`; row structs here map table rows onto the shared types.
//!
//! Embedded collections are `UUID[]` columns edited with `array_append` and
//! `array_remove` inside a single guarded `UPDATE`. Comments, chat messages
//! and direct messages are rows of their own, ordered by a `seq` column.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::backend::store::StoreError;
use crate::shared::community::{Chat, ChatMessage, Community};
use crate::shared::content::{Comment, Event, Post};
use crate::shared::messaging::{CanonicalPair, Conversation, DirectMessage};
use crate::shared::users::{BikeDetails, Role, User};

pub mod account;
pub mod comments;
pub mod communities;
pub mod events;
pub mod messaging;
pub mod posts;
pub mod users;

/// Map a unique violation to `Conflict`, anything else to `Database`
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::conflict(message),
        _ => StoreError::Database(err),
    }
}

/// Escape `%`, `_` and `\` for use inside an `ILIKE` pattern
pub(crate) fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub(crate) const USER_COLUMNS: &str = "id, username, full_name, email, password_hash, bio, location, \
     bike_details, role, photo, followers, following, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    id: Uuid,
    username: String,
    full_name: String,
    email: String,
    password_hash: String,
    bio: Option<String>,
    location: Option<String>,
    bike_details: Option<Json<BikeDetails>>,
    role: String,
    photo: Option<String>,
    followers: Vec<Uuid>,
    following: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            email: row.email,
            password_hash: row.password_hash,
            bio: row.bio,
            location: row.location,
            bike_details: row.bike_details.map(|details| details.0),
            role: Role::new(row.role),
            photo: row.photo,
            followers: row.followers,
            following: row.following,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) const POST_COLUMNS: &str = "id, description, location, category, tagged_users, media, \
     creator, likes, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PostRow {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    category: Option<String>,
    tagged_users: Vec<Uuid>,
    media: Option<String>,
    creator: Uuid,
    likes: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    pub(crate) fn into_post(self, comments: Vec<Comment>) -> Post {
        Post {
            id: self.id,
            description: self.description,
            location: self.location,
            category: self.category,
            tagged_users: self.tagged_users,
            media: self.media,
            creator: self.creator,
            likes: self.likes,
            comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }
}

pub(crate) const EVENT_COLUMNS: &str = "id, title, description, location, latitude, longitude, \
     category, date, image, creator, participants, likes, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    location: serde_json::Value,
    latitude: f64,
    longitude: f64,
    category: String,
    date: DateTime<Utc>,
    image: Option<String>,
    creator: Uuid,
    participants: Vec<Uuid>,
    likes: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventRow {
    pub(crate) fn into_event(self, comments: Vec<Comment>) -> Event {
        Event {
            id: self.id,
            title: self.title,
            description: self.description,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            category: self.category,
            date: self.date,
            image: self.image,
            creator: self.creator,
            participants: self.participants,
            likes: self.likes,
            comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommentRow {
    pub(crate) item_id: Uuid,
    id: Uuid,
    author: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            author: row.author,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

pub(crate) const COMMUNITY_COLUMNS: &str =
    "id, name, description, media, creator, members, chat_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommunityRow {
    id: Uuid,
    name: String,
    description: String,
    media: Option<String>,
    creator: Uuid,
    members: Vec<Uuid>,
    chat_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommunityRow> for Community {
    fn from(row: CommunityRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            media: row.media,
            creator: row.creator,
            members: row.members,
            chat_id: row.chat_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ChatRow {
    id: Uuid,
    community_id: Uuid,
    creator: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChatRow {
    pub(crate) fn into_chat(self, messages: Vec<ChatMessage>) -> Chat {
        Chat {
            id: self.id,
            community_id: self.community_id,
            creator: self.creator,
            messages,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ConversationRow {
    id: Uuid,
    participant_a: Uuid,
    participant_b: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = sqlx::Error;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        let participants = CanonicalPair::new(row.participant_a, row.participant_b)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(Self {
            id: row.id,
            participants,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    sender: Uuid,
    receiver: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for DirectMessage {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            conversation_id: row.conversation_id,
            sender: row.sender,
            receiver: row.receiver,
            content: row.content,
            created_at: row.created_at,
        }
    }
}
