//! User Data Structure
//!
//! Represents a user as the server returns it. Users are read-only on the client.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::config::AppConfig;

/// Server-assigned user identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A user of the chat service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    #[serde(rename = "_id")]
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    /// Stored image reference, relative to the uploads directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl User {
    /// First and last name joined by a space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Resolve the avatar to show, falling back to the placeholder
    pub fn avatar_url(&self, config: &AppConfig) -> String {
        match self.profile_image.as_deref() {
            Some(image) if !image.is_empty() => format!("{}{}", config.uploads_prefix, image),
            _ => config.default_avatar.clone(),
        }
    }
}
