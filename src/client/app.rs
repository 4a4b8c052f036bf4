//! Application Context
//!
//! Owns the pieces every view shares: the query cache, the API client, the active chat
//! list, the session and the notification sink. Created once at start and shut down
//! explicitly.

use std::sync::Arc;

use crate::client::api::{HttpApi, RemoteApi};
use crate::client::chat_list::ChatContext;
use crate::client::config::Config;
use crate::client::notify::SharedNotifier;
use crate::client::query::QueryCache;
use crate::client::relationships::PendingRequests;
use crate::client::search::SearchModal;
use crate::client::session::SessionProvider;
use crate::client::social_api::SocialApi;
use crate::shared::error::ApiError;

pub struct AppContext<A = HttpApi> {
    config: Config,
    cache: QueryCache,
    api: SocialApi<A>,
    session: Arc<dyn SessionProvider>,
    notifier: SharedNotifier,
    chats: ChatContext,
}

impl AppContext<HttpApi> {
    /// Build a context that talks to the configured server over HTTP
    pub fn connect(
        config: Config,
        session: Arc<dyn SessionProvider>,
        notifier: SharedNotifier,
    ) -> Result<Self, ApiError> {
        let http = HttpApi::new(config.clone(), Arc::clone(&session))?;
        tracing::info!(server = %config.server_url(), "app context created");
        Ok(Self::with_remote(config, Arc::new(http), session, notifier))
    }
}

impl<A: RemoteApi> AppContext<A> {
    pub fn with_remote(
        config: Config,
        remote: Arc<A>,
        session: Arc<dyn SessionProvider>,
        notifier: SharedNotifier,
    ) -> Self {
        Self {
            config,
            cache: QueryCache::new(),
            api: SocialApi::new(remote),
            session,
            notifier,
            chats: ChatContext::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn api(&self) -> &SocialApi<A> {
        &self.api
    }

    pub fn chats(&self) -> &ChatContext {
        &self.chats
    }

    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    pub fn notifier(&self) -> &SharedNotifier {
        &self.notifier
    }

    /// A fresh search modal writing into this context's chat list
    pub fn search_modal(&self) -> SearchModal<A> {
        SearchModal::new(
            self.api.clone(),
            self.chats.clone(),
            Arc::clone(&self.notifier),
        )
    }

    /// A pending-requests panel for the signed-in user
    pub fn pending_requests(&self) -> PendingRequests<A> {
        PendingRequests::new(
            self.api.clone(),
            self.cache.clone(),
            Arc::clone(&self.session),
            Arc::clone(&self.notifier),
            self.config.app().clone(),
        )
    }

    /// Tear down the cache. Waiting readers resolve with [`ApiError::Cancelled`].
    pub async fn shutdown(&self) {
        self.cache.shutdown().await;
        tracing::info!("app context shut down");
    }
}
