//! # User Search Modal
//!
//! Finds users by username and opens (or creates) a chat with the one selected.
//!
//! ## Lookups
//!
//! Typing only records text. A lookup is issued when input is finalized
//! ([`SearchModal::on_key_release`]), runs on its own task, and carries a sequence
//! number. Responses older than the last applied one are dropped, so results always
//! reflect the newest lookup that has answered.
//!
//! ## Lifetime
//!
//! Every task is bound to the modal's [`CancellationToken`]. Closing or dropping the
//! modal cancels it and anything still in flight is discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::api::RemoteApi;
use crate::client::chat_list::ChatContext;
use crate::client::notify::{Severity, SharedNotifier};
use crate::client::social_api::SocialApi;
use crate::shared::error::ApiError;
use crate::shared::messaging::{Chat, User, UserId};

pub const SEARCH_FALLBACK_MESSAGE: &str = "Something went wrong, cannot search for user!";
pub const OPEN_CHAT_FALLBACK_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Empty,
    Searching,
    Results,
    Error,
}

/// Observable modal state
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub input: String,
    pub phase: SearchPhase,
    pub results: Vec<User>,
    /// A create-or-get call is in flight
    pub selecting: bool,
    pub open: bool,
    issued: u64,
    applied: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            input: String::new(),
            phase: SearchPhase::Empty,
            results: Vec::new(),
            selecting: false,
            open: true,
            issued: 0,
            applied: 0,
        }
    }
}

impl SearchState {
    /// Apply the response to lookup `seq`. Returns false if it was fenced off.
    fn apply(&mut self, seq: u64, result: &Result<Vec<User>, ApiError>) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        let newest = seq == self.issued;
        match result {
            Ok(users) => {
                self.results = users.clone();
                self.phase = if newest {
                    SearchPhase::Results
                } else {
                    SearchPhase::Searching
                };
            }
            Err(_) => {
                self.results.clear();
                self.phase = if newest {
                    SearchPhase::Error
                } else {
                    SearchPhase::Searching
                };
            }
        }
        true
    }
}

pub struct SearchModal<A> {
    api: SocialApi<A>,
    chats: ChatContext,
    notifier: SharedNotifier,
    state: Arc<Mutex<SearchState>>,
    cancel: CancellationToken,
}

fn lock(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A: RemoteApi> SearchModal<A> {
    pub fn new(api: SocialApi<A>, chats: ChatContext, notifier: SharedNotifier) -> Self {
        Self {
            api,
            chats,
            notifier,
            state: Arc::new(Mutex::new(SearchState::default())),
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> SearchState {
        lock(&self.state).clone()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    /// Record the current input text. Never touches the network.
    pub fn on_input(&self, text: impl Into<String>) {
        lock(&self.state).input = text.into();
    }

    /// Input finalized. Empty input clears results; anything else starts a lookup.
    ///
    /// Returns the lookup task, if one was started.
    pub fn on_key_release(&self) -> Option<JoinHandle<()>> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let (seq, query) = {
            let mut state = lock(&self.state);
            if state.input.is_empty() {
                state.results.clear();
                state.phase = SearchPhase::Empty;
                // Anything still in flight is now older than what is shown.
                state.applied = state.issued;
                return None;
            }
            state.issued += 1;
            state.phase = SearchPhase::Searching;
            (state.issued, state.input.clone())
        };

        tracing::debug!(seq, %query, "user lookup issued");
        let api = self.api.clone();
        let state = Arc::clone(&self.state);
        let notifier = Arc::clone(&self.notifier);
        let cancel = self.cancel.clone();

        Some(tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = api.search_users(&query) => result,
            };

            let applied = {
                let mut state = lock(&state);
                if cancel.is_cancelled() {
                    return;
                }
                state.apply(seq, &result)
            };
            if !applied {
                tracing::debug!(seq, "discarding out-of-order lookup response");
                return;
            }

            match result {
                Ok(users) => tracing::debug!(seq, found = users.len(), "user lookup applied"),
                Err(error) => {
                    tracing::warn!(seq, %error, "user lookup failed");
                    notifier.notify(Severity::Error, &error.user_message(SEARCH_FALLBACK_MESSAGE));
                }
            }
        }))
    }

    /// Open the chat with `user`, creating it if needed.
    ///
    /// On success the chat becomes active, is upserted at the head of the chat list, and
    /// the modal closes. On failure the modal stays open and unchanged.
    pub async fn select_user(&self, user: &User) -> Result<Chat, ApiError> {
        self.open_chat_with(&user.id).await
    }

    /// [`Self::select_user`] for a user known only by id
    pub async fn open_chat_with(&self, user_id: &UserId) -> Result<Chat, ApiError> {
        if self.cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        lock(&self.state).selecting = true;

        let result = tokio::select! {
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            result = self.api.create_or_get_chat(user_id) => result,
        };
        lock(&self.state).selecting = false;

        match result {
            Ok(chat) => {
                if self.cancel.is_cancelled() {
                    return Err(ApiError::Cancelled);
                }
                tracing::info!(chat = %chat.id, user = %user_id, "chat opened from search");
                self.chats.open_chat(chat.clone());
                self.close();
                Ok(chat)
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(error) => {
                tracing::warn!(user = %user_id, %error, "create-or-get chat failed");
                self.notifier
                    .notify(Severity::Error, &error.user_message(OPEN_CHAT_FALLBACK_MESSAGE));
                Err(error)
            }
        }
    }

    /// Close the modal and abandon in-flight work
    pub fn close(&self) {
        lock(&self.state).open = false;
        self.cancel.cancel();
    }
}

impl<A> Drop for SearchModal<A> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
