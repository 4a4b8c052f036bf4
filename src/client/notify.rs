//! Notification Sink
//!
//! Transient user-visible toasts. Sending is fire-and-forget: a sink that has
//! nowhere to deliver a notification drops it.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Receives notifications
pub trait NotificationSink: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

pub type SharedNotifier = Arc<dyn NotificationSink>;

/// Forwards notifications into an unbounded channel for the UI loop to drain
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        let notification = Notification {
            severity,
            message: message.to_string(),
            created_at: Utc::now(),
        };
        if self.tx.send(notification).is_err() {
            tracing::trace!("notification receiver dropped");
        }
    }
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => tracing::info!(target: "chatlink::toast", "{}", message),
            Severity::Error => tracing::warn!(target: "chatlink::toast", "{}", message),
        }
    }
}
