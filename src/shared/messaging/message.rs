//! Direct message data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message in a direct conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: Uuid,
    pub receiver: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl DirectMessage {
    pub fn new(new_message: NewDirectMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id: new_message.conversation_id,
            sender: new_message.sender,
            receiver: new_message.receiver,
            content: new_message.content,
            created_at: Utc::now(),
        }
    }

    /// Truncated content for log lines
    pub fn preview(&self, max_len: usize) -> String {
        if self.content.chars().count() <= max_len {
            self.content.clone()
        } else {
            let truncated: String = self.content.chars().take(max_len).collect();
            format!("{}...", truncated)
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDirectMessage {
    pub conversation_id: Uuid,
    pub sender: Uuid,
    pub receiver: Uuid,
    pub content: String,
}
