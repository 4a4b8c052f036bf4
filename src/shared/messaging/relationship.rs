//! Relationship Request Data Structure
//!
//! A pending friend request addressed to the current user. A request only exists
//! on the client while it is part of the pending collection; accepting or deleting
//! it removes it server-side and the next fetch drops it.

use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// Server-assigned request identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// A pending relationship request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRequest {
    #[serde(rename = "_id")]
    pub id: RequestId,
    /// User who sent the request
    pub sent_by: User,
}

impl RelationshipRequest {
    /// Id the accept/delete endpoints expect
    pub fn sender_id(&self) -> &UserId {
        &self.sent_by.id
    }
}

/// Action taken on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipAction {
    Accept,
    Delete,
}

impl RelationshipAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipAction::Accept => "accept",
            RelationshipAction::Delete => "delete",
        }
    }
}

/// Body of the accept and delete calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipActionRequest {
    pub user_id: UserId,
}
