//! Communities and their chat threads
//!
//! Every community owns exactly one chat, created with it and removed with
//! it. Chat messages are append-only and kept in send order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::users::PublicUser;

/// Extensions accepted for community media
pub const COMMUNITY_MEDIA_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Check a community media file name against the allowed image extensions
pub fn is_allowed_media(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            COMMUNITY_MEDIA_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub media: Option<String>,
    pub creator: Uuid,
    pub members: Vec<Uuid>,
    pub chat_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Community {
    /// New community with the creator as its only member
    pub fn new(new_community: NewCommunity, chat_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new_community.name,
            description: new_community.description,
            media: new_community.media,
            creator: new_community.creator,
            members: vec![new_community.creator],
            chat_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_member(&self, user: Uuid) -> bool {
        self.members.contains(&user)
    }
}

#[derive(Debug, Clone)]
pub struct NewCommunity {
    pub name: String,
    pub description: String,
    pub media: Option<String>,
    pub creator: Uuid,
}

#[derive(Debug, Clone)]
pub struct CommunityUpdate {
    pub name: String,
    pub description: String,
    /// `None` keeps the stored media
    pub media: Option<String>,
}

impl CommunityUpdate {
    pub fn apply(self, community: &mut Community) {
        community.name = self.name;
        community.description = self.description;
        if let Some(media) = self.media {
            community.media = Some(media);
        }
        community.updated_at = Utc::now();
    }
}

/// Chat thread of one community
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: Uuid,
    pub community_id: Uuid,
    pub creator: Uuid,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(community_id: Uuid, creator: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            community_id,
            creator,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub community_id: Uuid,
    pub sender: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(community_id: Uuid, sender: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            community_id,
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Community with creator and members resolved
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub media: Option<String>,
    pub creator: Option<PublicUser>,
    pub members: Vec<PublicUser>,
    pub chat_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat: Option<Chat>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
