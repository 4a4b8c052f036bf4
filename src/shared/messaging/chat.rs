//! Chat Data Structure
//!
//! Represents a conversation between the current user and at least one other user.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::user::UserId;

/// Server-assigned chat identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chat as returned by create-or-get
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    #[serde(rename = "_id")]
    pub id: ChatId,
    /// Participant user IDs
    #[serde(default)]
    pub participants: Vec<UserId>,
}

impl Chat {
    /// Check if user is a participant
    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participants.contains(user_id)
    }

    /// Get the other participant (for direct chats)
    pub fn other_participant(&self, current_user_id: &UserId) -> Option<&UserId> {
        self.participants.iter().find(|id| *id != current_user_id)
    }
}

/// Body of the create-or-get call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrGetChatRequest {
    pub user_id: UserId,
}
