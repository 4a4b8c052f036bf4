//! Messaging Module
//!
//! This module contains all the data structures exchanged with the chat server:
//!
//! - `User` - a user returned by search or embedded in a request
//! - `RelationshipRequest` - a pending friend request
//! - `Chat` - a conversation returned by create-or-get
//! - `Envelope` - the `{ data, message }` response wrapper
//!
//! # Usage
//!
//! ```rust
//! use chatlink::shared::messaging::{Chat, Envelope, RelationshipRequest, User};
//! ```

pub mod user;
pub mod relationship;
pub mod chat;
pub mod envelope;

// Re-export all types
pub use user::{User, UserId};
pub use relationship::{
    RelationshipAction, RelationshipActionRequest, RelationshipRequest, RequestId,
};
pub use chat::{Chat, ChatId, CreateOrGetChatRequest};
pub use envelope::Envelope;
