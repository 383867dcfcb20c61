/**
 * In-memory Store
 *
 * Used when no database is configured and by the test suite. All state
 * lives behind one `tokio::sync::RwLock`; each mutating method takes the
 * write lock once, so every operation is atomic with respect to the others.
 *
 * Content and community records are kept in insertion order, which is also
 * creation order.
 */

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::store::{DeletionReport, JoinOutcome, StoreError, RELATED_LIMIT};
use crate::shared::community::{Chat, ChatMessage, Community, CommunityUpdate, NewCommunity};
use crate::shared::content::{
    toggle_like, Comment, ContentKind, Event, EventFilter, EventUpdate, NewEvent, NewPost, Post,
    PostUpdate,
};
use crate::shared::messaging::{CanonicalPair, Conversation, DirectMessage, NewDirectMessage};
use crate::shared::users::{NewUser, ProfileUpdate, Role, User};

const USER_NOT_FOUND: &str = "User not found";
const POST_NOT_FOUND: &str = "Post not found";
const EVENT_NOT_FOUND: &str = "Event not found";
const COMMUNITY_NOT_FOUND: &str = "Community not found";
const CHAT_NOT_FOUND: &str = "Chat not found";
const CONVERSATION_NOT_FOUND: &str = "Conversation not found";

/// Everything the memory backend holds
#[derive(Debug, Default)]
pub struct MemoryState {
    users: HashMap<Uuid, User>,
    posts: Vec<Post>,
    events: Vec<Event>,
    communities: Vec<Community>,
    chats: Vec<Chat>,
    conversations: Vec<Conversation>,
    messages: Vec<DirectMessage>,
}

impl MemoryState {
    /// First user other than `except` holding any of the unique fields
    fn unique_taken(&self, username: &str, email: &str, full_name: &str, except: Option<Uuid>) -> bool {
        self.users.values().any(|user| {
            Some(user.id) != except
                && (user.username == username || user.email == email || user.full_name == full_name)
        })
    }

    fn post_mut(&mut self, id: Uuid) -> Result<&mut Post, StoreError> {
        self.posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(StoreError::NotFound(POST_NOT_FOUND))
    }

    fn event_mut(&mut self, id: Uuid) -> Result<&mut Event, StoreError> {
        self.events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or(StoreError::NotFound(EVENT_NOT_FOUND))
    }

    fn community_mut(&mut self, id: Uuid) -> Result<&mut Community, StoreError> {
        self.communities
            .iter_mut()
            .find(|community| community.id == id)
            .ok_or(StoreError::NotFound(COMMUNITY_NOT_FOUND))
    }
}

/// Shared handle to the in-memory state
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Users

    pub async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if state.unique_taken(&new_user.username, &new_user.email, &new_user.full_name, None) {
            return Err(StoreError::conflict("User already exists"));
        }
        let user = User::new(new_user);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    pub async fn user_by_login(&self, email_or_username: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.email == email_or_username || user.username == email_or_username)
            .cloned())
    }

    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|user| user.username == username).cloned())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by_key(|user| user.created_at);
        Ok(users)
    }

    pub async fn search_users(&self, fragment: &str) -> Result<Vec<User>, StoreError> {
        let needle = fragment.to_lowercase();
        let mut users: Vec<User> = self
            .list_users()
            .await?
            .into_iter()
            .filter(|user| user.username.to_lowercase().contains(&needle))
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    pub async fn users_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, User>, StoreError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).map(|user| (*id, user.clone())))
            .collect())
    }

    pub async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Err(StoreError::NotFound(USER_NOT_FOUND));
        }
        if state.unique_taken(&update.username, &update.email, &update.full_name, Some(id)) {
            return Err(StoreError::conflict("Username, email or full name already in use"));
        }
        let user = state.users.get_mut(&id).ok_or(StoreError::NotFound(USER_NOT_FOUND))?;
        update.apply(user);
        Ok(user.clone())
    }

    pub async fn update_role(&self, id: Uuid, role: Role) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&id).ok_or(StoreError::NotFound(USER_NOT_FOUND))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub async fn follow(&self, follower: Uuid, followee: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&followee) {
            return Err(StoreError::NotFound(USER_NOT_FOUND));
        }
        let current = state.users.get_mut(&follower).ok_or(StoreError::NotFound(USER_NOT_FOUND))?;
        if current.is_following(followee) {
            return Err(StoreError::conflict("You already follow this user"));
        }
        current.following.push(followee);
        current.updated_at = Utc::now();

        let target = state.users.get_mut(&followee).ok_or(StoreError::NotFound(USER_NOT_FOUND))?;
        if !target.is_followed_by(follower) {
            target.followers.push(follower);
        }
        target.updated_at = Utc::now();
        Ok(())
    }

    pub async fn unfollow(&self, follower: Uuid, followee: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&followee) {
            return Err(StoreError::NotFound(USER_NOT_FOUND));
        }
        let current = state.users.get_mut(&follower).ok_or(StoreError::NotFound(USER_NOT_FOUND))?;
        if !current.is_following(followee) {
            return Err(StoreError::rejected("You do not follow this user"));
        }
        current.following.retain(|id| *id != followee);
        current.updated_at = Utc::now();

        let target = state.users.get_mut(&followee).ok_or(StoreError::NotFound(USER_NOT_FOUND))?;
        target.followers.retain(|id| *id != follower);
        target.updated_at = Utc::now();
        Ok(())
    }

    pub async fn delete_account(&self, id: Uuid) -> Result<DeletionReport, StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Err(StoreError::NotFound(USER_NOT_FOUND));
        }
        let mut report = DeletionReport::default();

        let before = state.events.len();
        state.events.retain(|event| event.creator != id);
        report.events = (before - state.events.len()) as u64;

        let before = state.posts.len();
        state.posts.retain(|post| post.creator != id);
        report.posts = (before - state.posts.len()) as u64;

        let owned: HashSet<Uuid> = state
            .communities
            .iter()
            .filter(|community| community.creator == id)
            .map(|community| community.id)
            .collect();
        state.communities.retain(|community| !owned.contains(&community.id));
        state.chats.retain(|chat| !owned.contains(&chat.community_id));
        report.communities = owned.len() as u64;

        let conversations: HashSet<Uuid> = state
            .conversations
            .iter()
            .filter(|conversation| conversation.has_participant(id))
            .map(|conversation| conversation.id)
            .collect();
        state.conversations.retain(|conversation| !conversations.contains(&conversation.id));
        let before = state.messages.len();
        state
            .messages
            .retain(|message| !conversations.contains(&message.conversation_id));
        report.messages = (before - state.messages.len()) as u64;
        report.conversations = conversations.len() as u64;

        for user in state.users.values_mut() {
            user.followers.retain(|other| *other != id);
            user.following.retain(|other| *other != id);
        }
        for post in state.posts.iter_mut() {
            post.likes.retain(|other| *other != id);
        }
        for event in state.events.iter_mut() {
            event.likes.retain(|other| *other != id);
            event.participants.retain(|other| *other != id);
        }
        for community in state.communities.iter_mut() {
            community.members.retain(|other| *other != id);
        }

        state.users.remove(&id);
        Ok(report)
    }

    // Posts

    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, StoreError> {
        let post = Post::new(new_post);
        self.state.write().await.posts.push(post.clone());
        Ok(post)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.state.read().await.posts.iter().rev().cloned().collect())
    }

    pub async fn post_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let state = self.state.read().await;
        Ok(state.posts.iter().find(|post| post.id == id).cloned())
    }

    pub async fn posts_by_creator(&self, creator: Uuid) -> Result<Vec<Post>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .iter()
            .rev()
            .filter(|post| post.creator == creator)
            .cloned()
            .collect())
    }

    pub async fn update_post(&self, id: Uuid, update: PostUpdate) -> Result<Post, StoreError> {
        let mut state = self.state.write().await;
        let post = state.post_mut(id)?;
        update.apply(post);
        Ok(post.clone())
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let before = state.posts.len();
        state.posts.retain(|post| post.id != id);
        if state.posts.len() == before {
            return Err(StoreError::NotFound(POST_NOT_FOUND));
        }
        Ok(())
    }

    pub async fn related_posts(&self, id: Uuid) -> Result<Vec<Post>, StoreError> {
        let state = self.state.read().await;
        let post = state
            .posts
            .iter()
            .find(|post| post.id == id)
            .ok_or(StoreError::NotFound(POST_NOT_FOUND))?;
        let Some(category) = post.category.as_deref() else {
            return Ok(Vec::new());
        };
        Ok(state
            .posts
            .iter()
            .filter(|other| other.id != id && other.category.as_deref() == Some(category))
            .take(RELATED_LIMIT)
            .cloned()
            .collect())
    }

    pub async fn toggle_post_like(&self, id: Uuid, user: Uuid) -> Result<Post, StoreError> {
        let mut state = self.state.write().await;
        let post = state.post_mut(id)?;
        toggle_like(&mut post.likes, user);
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    pub async fn add_comment(
        &self,
        kind: ContentKind,
        item: Uuid,
        comment: Comment,
    ) -> Result<Vec<Comment>, StoreError> {
        let mut state = self.state.write().await;
        let comments = match kind {
            ContentKind::Post => &mut state.post_mut(item)?.comments,
            ContentKind::Event => &mut state.event_mut(item)?.comments,
        };
        comments.push(comment);
        Ok(comments.clone())
    }

    // Events

    pub async fn create_event(&self, new_event: NewEvent) -> Result<Event, StoreError> {
        let event = Event::new(new_event);
        self.state.write().await.events.push(event.clone());
        Ok(event)
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.state.read().await.events.clone())
    }

    pub async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let state = self.state.read().await;
        Ok(state.events.iter().find(|event| event.id == id).cloned())
    }

    pub async fn events_by_creator(&self, creator: Uuid) -> Result<Vec<Event>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .filter(|event| event.creator == creator)
            .cloned()
            .collect())
    }

    pub async fn filter_events(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect())
    }

    pub async fn update_event(&self, id: Uuid, update: EventUpdate) -> Result<Event, StoreError> {
        let mut state = self.state.write().await;
        let event = state.event_mut(id)?;
        update.apply(event);
        Ok(event.clone())
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let before = state.events.len();
        state.events.retain(|event| event.id != id);
        if state.events.len() == before {
            return Err(StoreError::NotFound(EVENT_NOT_FOUND));
        }
        Ok(())
    }

    pub async fn related_events(&self, id: Uuid) -> Result<Vec<Event>, StoreError> {
        let state = self.state.read().await;
        let event = state
            .events
            .iter()
            .find(|event| event.id == id)
            .ok_or(StoreError::NotFound(EVENT_NOT_FOUND))?;
        Ok(state
            .events
            .iter()
            .filter(|other| other.id != id && other.category == event.category)
            .take(RELATED_LIMIT)
            .cloned()
            .collect())
    }

    pub async fn toggle_event_like(&self, id: Uuid, user: Uuid) -> Result<Event, StoreError> {
        let mut state = self.state.write().await;
        let event = state.event_mut(id)?;
        toggle_like(&mut event.likes, user);
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    pub async fn join_event(&self, id: Uuid, user: Uuid) -> Result<Event, StoreError> {
        let mut state = self.state.write().await;
        let event = state.event_mut(id)?;
        if event.participants.contains(&user) {
            return Err(StoreError::conflict("You have already joined this event"));
        }
        event.participants.push(user);
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    pub async fn leave_event(&self, id: Uuid, user: Uuid) -> Result<Event, StoreError> {
        let mut state = self.state.write().await;
        let event = state.event_mut(id)?;
        if !event.participants.contains(&user) {
            return Err(StoreError::rejected("You have not joined this event"));
        }
        event.participants.retain(|other| *other != user);
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    // Communities

    pub async fn create_community(&self, new_community: NewCommunity) -> Result<Community, StoreError> {
        let mut state = self.state.write().await;
        if state
            .communities
            .iter()
            .any(|community| community.name == new_community.name)
        {
            return Err(StoreError::conflict("A community with this name already exists"));
        }
        let creator = new_community.creator;
        let chat_id = Uuid::new_v4();
        let community = Community::new(new_community, chat_id);
        state.chats.push(Chat {
            id: chat_id,
            ..Chat::new(community.id, creator)
        });
        state.communities.push(community.clone());
        Ok(community)
    }

    pub async fn list_communities(&self) -> Result<Vec<Community>, StoreError> {
        Ok(self.state.read().await.communities.clone())
    }

    pub async fn community_by_id(&self, id: Uuid) -> Result<Option<Community>, StoreError> {
        let state = self.state.read().await;
        Ok(state.communities.iter().find(|community| community.id == id).cloned())
    }

    pub async fn communities_by_creator(&self, creator: Uuid) -> Result<Vec<Community>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .communities
            .iter()
            .filter(|community| community.creator == creator)
            .cloned()
            .collect())
    }

    pub async fn communities_by_member(&self, member: Uuid) -> Result<Vec<Community>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .communities
            .iter()
            .filter(|community| community.is_member(member))
            .cloned()
            .collect())
    }

    pub async fn update_community(
        &self,
        id: Uuid,
        update: CommunityUpdate,
    ) -> Result<Community, StoreError> {
        let mut state = self.state.write().await;
        if state
            .communities
            .iter()
            .any(|community| community.id != id && community.name == update.name)
        {
            return Err(StoreError::conflict("A community with this name already exists"));
        }
        let community = state.community_mut(id)?;
        update.apply(community);
        Ok(community.clone())
    }

    pub async fn delete_community(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let before = state.communities.len();
        state.communities.retain(|community| community.id != id);
        if state.communities.len() == before {
            return Err(StoreError::NotFound(COMMUNITY_NOT_FOUND));
        }
        state.chats.retain(|chat| chat.community_id != id);
        Ok(())
    }

    pub async fn join_community(&self, id: Uuid, user: Uuid) -> Result<JoinOutcome, StoreError> {
        let mut state = self.state.write().await;
        let community = state.community_mut(id)?;
        let joined = !community.is_member(user);
        if joined {
            community.members.push(user);
            community.updated_at = Utc::now();
        }
        Ok(JoinOutcome {
            community: community.clone(),
            joined,
        })
    }

    pub async fn leave_community(&self, id: Uuid, user: Uuid) -> Result<Community, StoreError> {
        let mut state = self.state.write().await;
        let community = state.community_mut(id)?;
        let Some(index) = community.members.iter().position(|member| *member == user) else {
            return Err(StoreError::rejected("User not in the community"));
        };
        community.members.remove(index);
        community.updated_at = Utc::now();
        Ok(community.clone())
    }

    pub async fn chat_by_community(&self, community: Uuid) -> Result<Option<Chat>, StoreError> {
        let state = self.state.read().await;
        Ok(state.chats.iter().find(|chat| chat.community_id == community).cloned())
    }

    pub async fn append_chat_message(&self, message: ChatMessage) -> Result<ChatMessage, StoreError> {
        let mut state = self.state.write().await;
        if !state
            .communities
            .iter()
            .any(|community| community.id == message.community_id)
        {
            return Err(StoreError::NotFound(COMMUNITY_NOT_FOUND));
        }
        let chat = state
            .chats
            .iter_mut()
            .find(|chat| chat.community_id == message.community_id)
            .ok_or(StoreError::NotFound(CHAT_NOT_FOUND))?;
        chat.messages.push(message.clone());
        chat.updated_at = Utc::now();
        Ok(message)
    }

    // Conversations and direct messages

    pub async fn get_or_create_conversation(
        &self,
        pair: CanonicalPair,
    ) -> Result<Conversation, StoreError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .conversations
            .iter()
            .find(|conversation| conversation.participants == pair)
        {
            return Ok(existing.clone());
        }
        let conversation = Conversation::new(pair);
        state.conversations.push(conversation.clone());
        Ok(conversation)
    }

    pub async fn conversation_by_id(&self, id: Uuid) -> Result<Option<Conversation>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .conversations
            .iter()
            .find(|conversation| conversation.id == id)
            .cloned())
    }

    pub async fn conversations_for_user(&self, user: Uuid) -> Result<Vec<Conversation>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .conversations
            .iter()
            .filter(|conversation| conversation.has_participant(user))
            .cloned()
            .collect())
    }

    pub async fn send_message(&self, new_message: NewDirectMessage) -> Result<DirectMessage, StoreError> {
        let mut state = self.state.write().await;
        let conversation = state
            .conversations
            .iter()
            .find(|conversation| conversation.id == new_message.conversation_id)
            .ok_or(StoreError::NotFound(CONVERSATION_NOT_FOUND))?;
        if !conversation.is_between(new_message.sender, new_message.receiver) {
            return Err(StoreError::rejected(
                "Sender and receiver must be the participants of the conversation",
            ));
        }
        let message = DirectMessage::new(new_message);
        state.messages.push(message.clone());
        Ok(message)
    }

    pub async fn messages_by_conversation(
        &self,
        conversation: Uuid,
    ) -> Result<Vec<DirectMessage>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .messages
            .iter()
            .filter(|message| message.conversation_id == conversation)
            .cloned()
            .collect())
    }
}
