//! Populate
//!
//! Stored records reference users by ID. Read endpoints resolve those IDs
//! into `PublicUser`s here, with one `users_by_ids` call per response no
//! matter how many records it holds.
//!
//! References to accounts that no longer exist resolve to `None` (single
//! references) or are dropped (lists).

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::store::Store;
use crate::shared::community::{Chat, Community, CommunityView};
use crate::shared::content::{Comment, CommentView, Event, EventView, Post, PostView};
use crate::shared::users::{PublicUser, User, UserProfile};

/// Users loaded for one response
#[derive(Debug, Default)]
pub struct Directory {
    users: HashMap<Uuid, User>,
}

impl Directory {
    /// Load every user in `ids` with a single store call
    pub async fn load(
        store: &Store,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> Result<Self, BackendError> {
        let ids: Vec<Uuid> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let users = store.users_by_ids(&ids).await?;
        Ok(Self { users })
    }

    pub fn public(&self, id: Uuid) -> Option<PublicUser> {
        self.users.get(&id).map(PublicUser::from)
    }

    /// Resolve a list of IDs, keeping its order
    pub fn publics(&self, ids: &[Uuid]) -> Vec<PublicUser> {
        ids.iter().filter_map(|id| self.public(*id)).collect()
    }

    /// Full records for a list of IDs, keeping its order
    pub fn users(&self, ids: &[Uuid]) -> Vec<User> {
        ids.iter().filter_map(|id| self.users.get(id).cloned()).collect()
    }

    pub fn comments(&self, comments: Vec<Comment>) -> Vec<CommentView> {
        comments
            .into_iter()
            .map(|comment| CommentView {
                id: comment.id,
                user: self.public(comment.author),
                content: comment.content,
                created_at: comment.created_at,
            })
            .collect()
    }

    pub fn post(&self, post: Post) -> PostView {
        PostView {
            id: post.id,
            description: post.description,
            location: post.location,
            category: post.category,
            tagged_users: self.publics(&post.tagged_users),
            media: post.media,
            creator: self.public(post.creator),
            likes: post.likes,
            comments: self.comments(post.comments),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    pub fn event(&self, event: Event) -> EventView {
        EventView {
            id: event.id,
            title: event.title,
            description: event.description,
            location: event.location,
            latitude: event.latitude,
            longitude: event.longitude,
            category: event.category,
            date: event.date,
            image: event.image,
            creator: self.public(event.creator),
            participants: self.publics(&event.participants),
            likes: event.likes,
            comments: self.comments(event.comments),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }

    pub fn community(&self, community: Community, chat: Option<Chat>) -> CommunityView {
        CommunityView {
            id: community.id,
            name: community.name,
            description: community.description,
            media: community.media,
            creator: self.public(community.creator),
            members: self.publics(&community.members),
            chat_id: community.chat_id,
            chat,
            created_at: community.created_at,
            updated_at: community.updated_at,
        }
    }
}

fn post_refs(post: &Post) -> impl Iterator<Item = Uuid> + '_ {
    std::iter::once(post.creator)
        .chain(post.tagged_users.iter().copied())
        .chain(post.comments.iter().map(|comment| comment.author))
}

fn event_refs(event: &Event) -> impl Iterator<Item = Uuid> + '_ {
    std::iter::once(event.creator)
        .chain(event.participants.iter().copied())
        .chain(event.comments.iter().map(|comment| comment.author))
}

fn community_refs(community: &Community) -> impl Iterator<Item = Uuid> + '_ {
    std::iter::once(community.creator).chain(community.members.iter().copied())
}

pub async fn post_views(store: &Store, posts: Vec<Post>) -> Result<Vec<PostView>, BackendError> {
    let directory = Directory::load(store, posts.iter().flat_map(post_refs)).await?;
    Ok(posts.into_iter().map(|post| directory.post(post)).collect())
}

pub async fn post_view(store: &Store, post: Post) -> Result<PostView, BackendError> {
    let directory = Directory::load(store, post_refs(&post)).await?;
    Ok(directory.post(post))
}

pub async fn event_views(store: &Store, events: Vec<Event>) -> Result<Vec<EventView>, BackendError> {
    let directory = Directory::load(store, events.iter().flat_map(event_refs)).await?;
    Ok(events.into_iter().map(|event| directory.event(event)).collect())
}

pub async fn event_view(store: &Store, event: Event) -> Result<EventView, BackendError> {
    let directory = Directory::load(store, event_refs(&event)).await?;
    Ok(directory.event(event))
}

pub async fn community_views(
    store: &Store,
    communities: Vec<Community>,
) -> Result<Vec<CommunityView>, BackendError> {
    let directory = Directory::load(store, communities.iter().flat_map(community_refs)).await?;
    Ok(communities
        .into_iter()
        .map(|community| directory.community(community, None))
        .collect())
}

pub async fn community_view(
    store: &Store,
    community: Community,
    chat: Option<Chat>,
) -> Result<CommunityView, BackendError> {
    let directory = Directory::load(store, community_refs(&community)).await?;
    Ok(directory.community(community, chat))
}

pub async fn comment_views(
    store: &Store,
    comments: Vec<Comment>,
) -> Result<Vec<CommentView>, BackendError> {
    let directory = Directory::load(store, comments.iter().map(|comment| comment.author)).await?;
    Ok(directory.comments(comments))
}

/// Full user records for `ids` in the given order, unknown IDs skipped
pub async fn users_in_order(store: &Store, ids: &[Uuid]) -> Result<Vec<User>, BackendError> {
    let directory = Directory::load(store, ids.iter().copied()).await?;
    Ok(directory.users(ids))
}

/// Profile of `user` as seen by `viewer`
pub async fn user_profile(
    store: &Store,
    user: User,
    viewer: Option<Uuid>,
) -> Result<UserProfile, BackendError> {
    let directory = Directory::load(
        store,
        user.followers.iter().chain(user.following.iter()).copied(),
    )
    .await?;
    let posts = store.posts_by_creator(user.id).await?;

    Ok(UserProfile {
        id: user.id,
        followers: directory.publics(&user.followers),
        following: directory.publics(&user.following),
        followers_count: user.followers.len(),
        following_count: user.following.len(),
        is_following: viewer.map(|viewer| user.is_followed_by(viewer)),
        posts,
        username: user.username,
        full_name: user.full_name,
        bio: user.bio,
        location: user.location,
        bike_details: user.bike_details,
        photo: user.photo,
        role: user.role,
    })
}
