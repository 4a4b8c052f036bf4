//! Shared Module
//!
//! Types shared by every layer of the client: the wire model of the chat server,
//! the error taxonomy for remote calls, and application configuration.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Wire types for users, relationship requests and chats
pub mod messaging;

/// Re-export commonly used types for convenience
pub use error::ApiError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
