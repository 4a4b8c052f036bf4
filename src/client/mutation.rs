//! # Mutation Executor
//!
//! Runs a single remote write and, strictly after it succeeds, invalidates the
//! query keys that depend on it. The executor never touches cached data itself.
//!
//! ## State Machine
//!
//! `Idle -> Executing -> Idle`. A call made while another is executing is rejected
//! with [`MutationError::InFlight`] before any network traffic; callers disable their
//! controls while [`MutationExecutor::is_executing`] is true.

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::client::notify::{Severity, SharedNotifier};
use crate::client::query::{QueryCache, QueryKey};
use crate::shared::error::ApiError;
use crate::shared::messaging::Envelope;

/// Shown when a failed mutation carries no server message
pub const MUTATION_FALLBACK_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Executing { target: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("another mutation is already in flight")]
    InFlight,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl MutationError {
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            MutationError::Api(error) => Some(error),
            MutationError::InFlight => None,
        }
    }
}

/// Resets the executor to idle even if the executing future is dropped mid-flight
struct IdleOnDrop<'a>(&'a watch::Sender<MutationStatus>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(MutationStatus::Idle);
    }
}

#[derive(Clone)]
pub struct MutationExecutor {
    cache: QueryCache,
    notifier: SharedNotifier,
    status: Arc<watch::Sender<MutationStatus>>,
}

impl MutationExecutor {
    pub fn new(cache: QueryCache, notifier: SharedNotifier) -> Self {
        let (status, _) = watch::channel(MutationStatus::Idle);
        Self {
            cache,
            notifier,
            status: Arc::new(status),
        }
    }

    /// Run `write` for `target`, then invalidate every key in `invalidates`.
    ///
    /// Success notifies with the server message when one is present. Failure notifies
    /// with the server message or the generic fallback, and leaves the cache alone.
    pub async fn execute<F, Fut>(
        &self,
        target: impl Into<String>,
        invalidates: &[QueryKey],
        write: F,
    ) -> Result<Envelope, MutationError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Envelope, ApiError>>,
    {
        let target = target.into();
        let claimed = self.status.send_if_modified(|status| match status {
            MutationStatus::Idle => {
                *status = MutationStatus::Executing {
                    target: target.clone(),
                };
                true
            }
            MutationStatus::Executing { .. } => false,
        });
        if !claimed {
            tracing::debug!(%target, "mutation rejected, another is in flight");
            return Err(MutationError::InFlight);
        }
        let _idle = IdleOnDrop(&self.status);

        match write().await {
            Ok(envelope) => {
                if let Some(message) = envelope.message.as_deref() {
                    self.notifier.notify(Severity::Success, message);
                }
                for key in invalidates {
                    self.cache.invalidate(key).await;
                }
                tracing::info!(%target, "mutation succeeded");
                Ok(envelope)
            }
            Err(error) => {
                tracing::warn!(%target, %error, "mutation failed");
                self.notifier.notify(
                    Severity::Error,
                    &error.user_message(MUTATION_FALLBACK_MESSAGE),
                );
                Err(error.into())
            }
        }
    }

    pub fn status(&self) -> MutationStatus {
        self.status.borrow().clone()
    }

    pub fn is_executing(&self) -> bool {
        matches!(*self.status.borrow(), MutationStatus::Executing { .. })
    }

    pub fn is_executing_for(&self, target: &str) -> bool {
        matches!(&*self.status.borrow(), MutationStatus::Executing { target: t } if t == target)
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationStatus> {
        self.status.subscribe()
    }
}
