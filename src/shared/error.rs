//! Shared Error Types
//!
//! This module defines the failure taxonomy for every remote call the client makes.
//! The same error value is handed to every caller waiting on a cached query, so all
//! variants are cheap to clone.
//!
//! # Error Categories
//!
//! - `Network` - transport-level failure, no response received
//! - `Server` - the remote answered with a non-success status
//! - `Validation` - reserved for client-side input checks
//! - `Decode` - the response body was not the expected envelope
//! - `Cancelled` - the owner of the request was torn down before it settled
//!
//! # Usage
//!
//! ```rust
//! use chatlink::shared::error::ApiError;
//!
//! let error = ApiError::server(403, Some("User blocked you".to_string()));
//! assert_eq!(error.user_message("Something went wrong!"), "User blocked you");
//! ```
use thiserror::Error;

/// Errors surfaced by remote data access and everything layered on top of it
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received
    #[error("Network error: {message}")]
    Network {
        /// Transport-level description
        message: String,
    },

    /// The remote returned a failure envelope
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        /// HTTP status code
        status: u16,
        /// Message carried by the failure envelope, if any
        message: Option<String>,
    },

    /// Client-side validation failure
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Response body could not be decoded
    #[error("Decode error: {message}")]
    Decode {
        /// Human-readable error message
        message: String,
    },

    /// The request owner went away before the result was applied
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new server error
    pub fn server(status: u16, message: Option<String>) -> Self {
        Self::Server { status, message }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// The server-provided message, when the remote sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Text to show the user: the server message if present, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::decode(err.to_string());
        }
        match err.status() {
            Some(status) => Self::server(status.as_u16(), None),
            None => Self::network(err.to_string()),
        }
    }
}
