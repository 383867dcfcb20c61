//! Store Module
//!
//! `Store` is the persistence handle shared by every handler. It has two
//! backends with the same semantics:
//!
//! - **`Postgres`** - `sqlx` pool, used when `DATABASE_URL` is set
//! - **`Memory`** - `Arc<RwLock<MemoryState>>`, used otherwise and in tests
//!
//! # Atomicity
//!
//! Every read-modify-write on an embedded collection (likes, participants,
//! members, follower edges, comments, chat messages) is one store call. The
//! PostgreSQL backend expresses it as a single conditional statement or a
//! transaction; the memory backend performs it inside one write-lock section.
//! Handlers never read a collection, edit it and write it back.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs       - Store dispatch, StoreError, DeletionReport
//! ├── memory.rs    - In-memory backend
//! └── postgres/    - PostgreSQL backend, one file per aggregate
//! ```

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::community::{Chat, ChatMessage, Community, CommunityUpdate, NewCommunity};
use crate::shared::content::{
    Comment, ContentKind, Event, EventFilter, EventUpdate, NewEvent, NewPost, Post, PostUpdate,
};
use crate::shared::messaging::{CanonicalPair, Conversation, DirectMessage, NewDirectMessage};
use crate::shared::users::{NewUser, ProfileUpdate, Role, User};

/// In-memory backend
pub mod memory;

/// PostgreSQL backend
pub mod postgres;

pub use memory::MemoryStore;

/// Number of related items returned for a post or event
pub const RELATED_LIMIT: usize = 5;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist
    #[error("{0}")]
    NotFound(&'static str),

    /// A unique value is taken or an edge already exists
    #[error("{0}")]
    Conflict(String),

    /// The operation does not apply to the current state
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// Entities removed by an account deletion
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub events: u64,
    pub posts: u64,
    pub communities: u64,
    pub conversations: u64,
    pub messages: u64,
}

/// Outcome of a community join
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub community: Community,
    /// `false` when the user was already a member
    pub joined: bool,
}

/// Persistence handle
#[derive(Clone)]
pub enum Store {
    Postgres(PgPool),
    Memory(MemoryStore),
}

impl Store {
    /// Empty in-memory store
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    // Users

    pub async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::users::create_user(pool, new_user).await,
            Self::Memory(memory) => memory.create_user(new_user).await,
        }
    }

    pub async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::users::user_by_id(pool, id).await,
            Self::Memory(memory) => memory.user_by_id(id).await,
        }
    }

    /// Look a user up by email or username
    pub async fn user_by_login(&self, email_or_username: &str) -> Result<Option<User>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::users::user_by_login(pool, email_or_username).await,
            Self::Memory(memory) => memory.user_by_login(email_or_username).await,
        }
    }

    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::users::user_by_username(pool, username).await,
            Self::Memory(memory) => memory.user_by_username(username).await,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::users::list_users(pool).await,
            Self::Memory(memory) => memory.list_users().await,
        }
    }

    /// Case-insensitive substring match on usernames
    pub async fn search_users(&self, fragment: &str) -> Result<Vec<User>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::users::search_users(pool, fragment).await,
            Self::Memory(memory) => memory.search_users(fragment).await,
        }
    }

    /// Users for the given IDs; unknown IDs are skipped
    pub async fn users_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, User>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        match self {
            Self::Postgres(pool) => postgres::users::users_by_ids(pool, ids).await,
            Self::Memory(memory) => memory.users_by_ids(ids).await,
        }
    }

    pub async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::users::update_profile(pool, id, update).await,
            Self::Memory(memory) => memory.update_profile(id, update).await,
        }
    }

    pub async fn update_role(&self, id: Uuid, role: Role) -> Result<User, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::users::update_role(pool, id, role).await,
            Self::Memory(memory) => memory.update_role(id, role).await,
        }
    }

    /// Add the `follower -> followee` edge on both users
    pub async fn follow(&self, follower: Uuid, followee: Uuid) -> Result<(), StoreError> {
        if follower == followee {
            return Err(StoreError::rejected("You cannot follow yourself"));
        }
        match self {
            Self::Postgres(pool) => postgres::users::follow(pool, follower, followee).await,
            Self::Memory(memory) => memory.follow(follower, followee).await,
        }
    }

    /// Remove the `follower -> followee` edge from both users
    pub async fn unfollow(&self, follower: Uuid, followee: Uuid) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => postgres::users::unfollow(pool, follower, followee).await,
            Self::Memory(memory) => memory.unfollow(follower, followee).await,
        }
    }

    /// Delete a user and everything that belongs to them, all or nothing
    pub async fn delete_account(&self, id: Uuid) -> Result<DeletionReport, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::account::delete_account(pool, id).await,
            Self::Memory(memory) => memory.delete_account(id).await,
        }
    }

    // Posts

    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::posts::create_post(pool, new_post).await,
            Self::Memory(memory) => memory.create_post(new_post).await,
        }
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::posts::list_posts(pool).await,
            Self::Memory(memory) => memory.list_posts().await,
        }
    }

    pub async fn post_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::posts::post_by_id(pool, id).await,
            Self::Memory(memory) => memory.post_by_id(id).await,
        }
    }

    pub async fn posts_by_creator(&self, creator: Uuid) -> Result<Vec<Post>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::posts::posts_by_creator(pool, creator).await,
            Self::Memory(memory) => memory.posts_by_creator(creator).await,
        }
    }

    pub async fn update_post(&self, id: Uuid, update: PostUpdate) -> Result<Post, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::posts::update_post(pool, id, update).await,
            Self::Memory(memory) => memory.update_post(id, update).await,
        }
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => postgres::posts::delete_post(pool, id).await,
            Self::Memory(memory) => memory.delete_post(id).await,
        }
    }

    /// Up to five other posts of the same category
    pub async fn related_posts(&self, id: Uuid) -> Result<Vec<Post>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::posts::related_posts(pool, id).await,
            Self::Memory(memory) => memory.related_posts(id).await,
        }
    }

    pub async fn toggle_post_like(&self, id: Uuid, user: Uuid) -> Result<Post, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::posts::toggle_like(pool, id, user).await,
            Self::Memory(memory) => memory.toggle_post_like(id, user).await,
        }
    }

    /// Append a comment and return the item's full comment list
    pub async fn add_comment(
        &self,
        kind: ContentKind,
        item: Uuid,
        comment: Comment,
    ) -> Result<Vec<Comment>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::comments::add_comment(pool, kind, item, comment).await,
            Self::Memory(memory) => memory.add_comment(kind, item, comment).await,
        }
    }

    // Events

    pub async fn create_event(&self, new_event: NewEvent) -> Result<Event, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::create_event(pool, new_event).await,
            Self::Memory(memory) => memory.create_event(new_event).await,
        }
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::list_events(pool).await,
            Self::Memory(memory) => memory.list_events().await,
        }
    }

    pub async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::event_by_id(pool, id).await,
            Self::Memory(memory) => memory.event_by_id(id).await,
        }
    }

    pub async fn events_by_creator(&self, creator: Uuid) -> Result<Vec<Event>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::events_by_creator(pool, creator).await,
            Self::Memory(memory) => memory.events_by_creator(creator).await,
        }
    }

    pub async fn filter_events(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::filter_events(pool, filter).await,
            Self::Memory(memory) => memory.filter_events(filter).await,
        }
    }

    pub async fn update_event(&self, id: Uuid, update: EventUpdate) -> Result<Event, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::update_event(pool, id, update).await,
            Self::Memory(memory) => memory.update_event(id, update).await,
        }
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::delete_event(pool, id).await,
            Self::Memory(memory) => memory.delete_event(id).await,
        }
    }

    pub async fn related_events(&self, id: Uuid) -> Result<Vec<Event>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::related_events(pool, id).await,
            Self::Memory(memory) => memory.related_events(id).await,
        }
    }

    pub async fn toggle_event_like(&self, id: Uuid, user: Uuid) -> Result<Event, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::toggle_like(pool, id, user).await,
            Self::Memory(memory) => memory.toggle_event_like(id, user).await,
        }
    }

    /// Add a participant; joining twice is a conflict
    pub async fn join_event(&self, id: Uuid, user: Uuid) -> Result<Event, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::join_event(pool, id, user).await,
            Self::Memory(memory) => memory.join_event(id, user).await,
        }
    }

    /// Remove a participant; leaving without joining is rejected
    pub async fn leave_event(&self, id: Uuid, user: Uuid) -> Result<Event, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::events::leave_event(pool, id, user).await,
            Self::Memory(memory) => memory.leave_event(id, user).await,
        }
    }

    // Communities

    /// Create a community together with its chat
    pub async fn create_community(&self, new_community: NewCommunity) -> Result<Community, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::create_community(pool, new_community).await,
            Self::Memory(memory) => memory.create_community(new_community).await,
        }
    }

    pub async fn list_communities(&self) -> Result<Vec<Community>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::list_communities(pool).await,
            Self::Memory(memory) => memory.list_communities().await,
        }
    }

    pub async fn community_by_id(&self, id: Uuid) -> Result<Option<Community>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::community_by_id(pool, id).await,
            Self::Memory(memory) => memory.community_by_id(id).await,
        }
    }

    pub async fn communities_by_creator(&self, creator: Uuid) -> Result<Vec<Community>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::communities_by_creator(pool, creator).await,
            Self::Memory(memory) => memory.communities_by_creator(creator).await,
        }
    }

    pub async fn communities_by_member(&self, member: Uuid) -> Result<Vec<Community>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::communities_by_member(pool, member).await,
            Self::Memory(memory) => memory.communities_by_member(member).await,
        }
    }

    pub async fn update_community(
        &self,
        id: Uuid,
        update: CommunityUpdate,
    ) -> Result<Community, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::update_community(pool, id, update).await,
            Self::Memory(memory) => memory.update_community(id, update).await,
        }
    }

    /// Delete a community and its chat
    pub async fn delete_community(&self, id: Uuid) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::delete_community(pool, id).await,
            Self::Memory(memory) => memory.delete_community(id).await,
        }
    }

    /// Add a member; joining twice leaves the member set unchanged
    pub async fn join_community(&self, id: Uuid, user: Uuid) -> Result<JoinOutcome, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::join_community(pool, id, user).await,
            Self::Memory(memory) => memory.join_community(id, user).await,
        }
    }

    /// Remove a member; leaving without membership is rejected
    pub async fn leave_community(&self, id: Uuid, user: Uuid) -> Result<Community, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::leave_community(pool, id, user).await,
            Self::Memory(memory) => memory.leave_community(id, user).await,
        }
    }

    pub async fn chat_by_community(&self, community: Uuid) -> Result<Option<Chat>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::chat_by_community(pool, community).await,
            Self::Memory(memory) => memory.chat_by_community(community).await,
        }
    }

    /// Append a message to a community's chat
    pub async fn append_chat_message(&self, message: ChatMessage) -> Result<ChatMessage, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::communities::append_chat_message(pool, message).await,
            Self::Memory(memory) => memory.append_chat_message(message).await,
        }
    }

    // Conversations and direct messages

    /// Find the conversation for a pair or create it
    pub async fn get_or_create_conversation(
        &self,
        pair: CanonicalPair,
    ) -> Result<Conversation, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::messaging::get_or_create_conversation(pool, pair).await,
            Self::Memory(memory) => memory.get_or_create_conversation(pair).await,
        }
    }

    pub async fn conversation_by_id(&self, id: Uuid) -> Result<Option<Conversation>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::messaging::conversation_by_id(pool, id).await,
            Self::Memory(memory) => memory.conversation_by_id(id).await,
        }
    }

    pub async fn conversations_for_user(&self, user: Uuid) -> Result<Vec<Conversation>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::messaging::conversations_for_user(pool, user).await,
            Self::Memory(memory) => memory.conversations_for_user(user).await,
        }
    }

    /// Append a direct message to an existing conversation between sender and receiver
    pub async fn send_message(&self, new_message: NewDirectMessage) -> Result<DirectMessage, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::messaging::send_message(pool, new_message).await,
            Self::Memory(memory) => memory.send_message(new_message).await,
        }
    }

    /// Messages of a conversation in ascending creation order
    pub async fn messages_by_conversation(
        &self,
        conversation: Uuid,
    ) -> Result<Vec<DirectMessage>, StoreError> {
        match self {
            Self::Postgres(pool) => postgres::messaging::messages_by_conversation(pool, conversation).await,
            Self::Memory(memory) => memory.messages_by_conversation(conversation).await,
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Store").field(&self.backend_name()).finish()
    }
}
