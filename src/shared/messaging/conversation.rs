//! Conversation Data Structure
//!
//! A conversation belongs to exactly two distinct users. Its identity is the
//! canonical pair: the two IDs in ascending order of their hyphenated
//! lowercase string form. For UUIDs that order is the same as byte order,
//! which is also how PostgreSQL compares `uuid` values, so the store's
//! `participant_a < participant_b` check agrees with this type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Two distinct participants in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[Uuid; 2]", into = "[Uuid; 2]")]
pub struct CanonicalPair {
    first: Uuid,
    second: Uuid,
}

impl CanonicalPair {
    /// Order two participants; the same user twice is rejected
    pub fn new(a: Uuid, b: Uuid) -> Result<Self, SharedError> {
        if a == b {
            return Err(SharedError::validation(
                "receiverId",
                "cannot start a conversation with yourself",
            ));
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { first, second })
    }

    pub fn first(&self) -> Uuid {
        self.first
    }

    pub fn second(&self) -> Uuid {
        self.second
    }

    pub fn contains(&self, user: Uuid) -> bool {
        self.first == user || self.second == user
    }

    /// The participant that is not `user`
    pub fn other(&self, user: Uuid) -> Option<Uuid> {
        if self.first == user {
            Some(self.second)
        } else if self.second == user {
            Some(self.first)
        } else {
            None
        }
    }
}

impl TryFrom<[Uuid; 2]> for CanonicalPair {
    type Error = SharedError;

    fn try_from(value: [Uuid; 2]) -> Result<Self, Self::Error> {
        Self::new(value[0], value[1])
    }
}

impl From<CanonicalPair> for [Uuid; 2] {
    fn from(pair: CanonicalPair) -> Self {
        [pair.first, pair.second]
    }
}

/// Conversation between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    /// Serialised as a two-element array
    pub participants: CanonicalPair,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(participants: CanonicalPair) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            participants,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participants.contains(user_id)
    }

    /// Both IDs are the two participants, in either order
    pub fn is_between(&self, a: Uuid, b: Uuid) -> bool {
        CanonicalPair::new(a, b).map_or(false, |pair| pair == self.participants)
    }
}
