//! # Pending Requests Panel
//!
//! Lists the relationship requests waiting on the current user and lets them accept
//! or decline each one.
//!
//! The list lives in the shared [`QueryCache`] under `["pendingRequests", <user id>]`.
//! Accepting or declining goes through a [`MutationExecutor`] that invalidates the
//! whole `pendingRequests` prefix once the server confirms, and a mounted panel
//! refetches as soon as it sees its entry go stale.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::api::RemoteApi;
use crate::client::mutation::{MutationError, MutationExecutor};
use crate::client::notify::{Severity, SharedNotifier};
use crate::client::query::{QueryCache, QueryKey, QueryResult, QueryStatus};
use crate::client::session::SessionProvider;
use crate::client::social_api::SocialApi;
use crate::shared::config::AppConfig;
use crate::shared::error::ApiError;
use crate::shared::messaging::{Envelope, RelationshipAction, RelationshipRequest, UserId};

pub const PENDING_REQUESTS_RESOURCE: &str = "pendingRequests";
pub const PENDING_FALLBACK_MESSAGE: &str = "Could not fetch pending requests, something went Wrong!";
pub const NO_PENDING_REQUESTS: &str = "No pending requests.";

/// Cache key for `user_id`'s pending requests
pub fn pending_requests_key(user_id: &UserId) -> QueryKey {
    QueryKey::new(PENDING_REQUESTS_RESOURCE).with(user_id)
}

/// One request as the panel shows it
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRow {
    pub request: RelationshipRequest,
    pub name: String,
    pub avatar_url: String,
    /// Accept/decline controls are inactive while any action is executing
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PendingView {
    Loading,
    /// Fetch failed. [`PendingRequests::retry`] fetches again.
    Failed { message: String },
    Empty,
    Ready(Vec<PendingRow>),
}

/// Fetch path shared by the panel and its mount loop
struct Loader<A> {
    api: SocialApi<A>,
    cache: QueryCache,
    notifier: SharedNotifier,
}

impl<A> Clone for Loader<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            cache: self.cache.clone(),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<A: RemoteApi> Loader<A> {
    async fn load(&self, key: &QueryKey) -> QueryResult<Vec<RelationshipRequest>> {
        let api = self.api.clone();
        let result = self
            .cache
            .get(key, move || async move { api.pending_requests().await })
            .await;

        if let Some(error) = result.error.as_ref().filter(|e| !e.is_cancelled()) {
            tracing::warn!(%key, %error, "could not load pending requests");
            self.notifier
                .notify(Severity::Error, &error.user_message(PENDING_FALLBACK_MESSAGE));
        }
        result
    }
}

pub struct PendingRequests<A> {
    loader: Loader<A>,
    session: Arc<dyn SessionProvider>,
    executor: MutationExecutor,
    app: AppConfig,
    cancel: CancellationToken,
}

impl<A: RemoteApi> PendingRequests<A> {
    pub fn new(
        api: SocialApi<A>,
        cache: QueryCache,
        session: Arc<dyn SessionProvider>,
        notifier: SharedNotifier,
        app: AppConfig,
    ) -> Self {
        let executor = MutationExecutor::new(cache.clone(), Arc::clone(&notifier));
        Self {
            loader: Loader {
                api,
                cache,
                notifier,
            },
            session,
            executor,
            app,
            cancel: CancellationToken::new(),
        }
    }

    /// Key for the signed-in user's requests
    pub fn key(&self) -> Result<QueryKey, ApiError> {
        self.session
            .current_user_id()
            .map(|user_id| pending_requests_key(&user_id))
            .ok_or_else(|| ApiError::validation("session", "no user is signed in"))
    }

    /// Read the pending list through the cache
    pub async fn load(&self) -> QueryResult<Vec<RelationshipRequest>> {
        match self.key() {
            Ok(key) => self.loader.load(&key).await,
            Err(error) => QueryResult {
                status: QueryStatus::Error,
                data: None,
                error: Some(error),
            },
        }
    }

    /// Mark the list stale and fetch it again
    pub async fn retry(&self) -> QueryResult<Vec<RelationshipRequest>> {
        if let Ok(key) = self.key() {
            self.loader.cache.invalidate(&key).await;
        }
        self.load().await
    }

    /// Keep the list loaded while the panel is shown. Stops on [`Self::unmount`],
    /// on drop, or when the cache shuts down.
    pub fn mount(&self) -> Result<JoinHandle<()>, ApiError> {
        let key = self.key()?;
        let loader = self.loader.clone();
        let cancel = self.cancel.clone();

        Ok(tokio::spawn(async move {
            let mut subscription = loader.cache.subscribe(&key).await;
            tracing::debug!(%key, "pending requests mounted");
            loop {
                let snapshot = subscription.current();
                let needs_fetch = match snapshot.status {
                    QueryStatus::Idle => true,
                    QueryStatus::Success | QueryStatus::Error => snapshot.stale,
                    QueryStatus::Loading => snapshot.stale,
                };
                if needs_fetch {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = loader.load(&key) => {}
                    }
                }

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = subscription.changed() => {
                        if changed.is_none() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(%key, "pending requests unmounted");
        }))
    }

    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    /// Current view model, without fetching
    pub async fn view(&self) -> PendingView {
        let key = match self.key() {
            Ok(key) => key,
            Err(error) => {
                return PendingView::Failed {
                    message: error.user_message(PENDING_FALLBACK_MESSAGE),
                }
            }
        };
        let Some(snapshot) = self.loader.cache.peek(&key).await else {
            return PendingView::Loading;
        };

        match (snapshot.status, snapshot.data::<Vec<RelationshipRequest>>()) {
            (QueryStatus::Error, _) => PendingView::Failed {
                message: snapshot
                    .error
                    .as_ref()
                    .map(|e| e.user_message(PENDING_FALLBACK_MESSAGE))
                    .unwrap_or_else(|| PENDING_FALLBACK_MESSAGE.to_string()),
            },
            (_, Some(requests)) if requests.is_empty() => PendingView::Empty,
            (_, Some(requests)) => {
                let disabled = self.executor.is_executing();
                PendingView::Ready(
                    requests
                        .iter()
                        .map(|request| PendingRow {
                            name: request.sent_by.full_name(),
                            avatar_url: request.sent_by.avatar_url(&self.app),
                            request: request.clone(),
                            disabled,
                        })
                        .collect(),
                )
            }
            _ => PendingView::Loading,
        }
    }

    pub fn is_executing(&self) -> bool {
        self.executor.is_executing()
    }

    pub fn executor(&self) -> &MutationExecutor {
        &self.executor
    }

    /// Accept or decline `request`. The pending list is invalidated only on success.
    pub async fn respond(
        &self,
        action: RelationshipAction,
        request: &RelationshipRequest,
    ) -> Result<Envelope, MutationError> {
        let api = self.loader.api.clone();
        let user_id = request.sender_id().clone();
        tracing::debug!(request = %request.id.0, action = action.as_str(), "responding to request");

        self.executor
            .execute(
                request.id.0.clone(),
                &[QueryKey::new(PENDING_REQUESTS_RESOURCE)],
                move || async move { api.respond_to_request(action, &user_id).await },
            )
            .await
    }

    pub async fn accept(&self, request: &RelationshipRequest) -> Result<Envelope, MutationError> {
        self.respond(RelationshipAction::Accept, request).await
    }

    pub async fn decline(&self, request: &RelationshipRequest) -> Result<Envelope, MutationError> {
        self.respond(RelationshipAction::Delete, request).await
    }
}

impl<A> Drop for PendingRequests<A> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
