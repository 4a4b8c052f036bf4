//! Social API Client
//!
//! Typed wrappers over [`RemoteApi`] for the endpoints the search modal and the
//! pending-requests sidebar use.

use reqwest::Method;
use std::sync::Arc;

use crate::client::api::RemoteApi;
use crate::shared::error::ApiError;
use crate::shared::messaging::{
    Chat, CreateOrGetChatRequest, Envelope, RelationshipAction, RelationshipActionRequest,
    RelationshipRequest, User, UserId,
};

pub const SEARCH_USERS_PATH: &str = "/profile/search/user";
pub const CREATE_OR_GET_CHAT_PATH: &str = "/chats/create-or-get";
pub const PENDING_REQUESTS_PATH: &str = "/relationship/pending";
pub const ACCEPT_REQUEST_PATH: &str = "/relationship/accept";
pub const DELETE_REQUEST_PATH: &str = "/relationship/delete";

/// Social API client
pub struct SocialApi<A> {
    remote: Arc<A>,
}

impl<A> Clone for SocialApi<A> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
        }
    }
}

impl<A: RemoteApi> SocialApi<A> {
    pub fn new(remote: Arc<A>) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &Arc<A> {
        &self.remote
    }

    /// Find users whose username matches `query`
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError> {
        let envelope = self
            .remote
            .fetch(SEARCH_USERS_PATH, &[("username", query)])
            .await?;
        Ok(envelope.decode::<Vec<User>>()?.data.unwrap_or_default())
    }

    /// Return the chat with `user_id`, creating it if none exists
    pub async fn create_or_get_chat(&self, user_id: &UserId) -> Result<Chat, ApiError> {
        let body = serde_json::to_value(CreateOrGetChatRequest {
            user_id: user_id.clone(),
        })?;
        self.remote
            .mutate(Method::POST, CREATE_OR_GET_CHAT_PATH, body)
            .await?
            .into_data()
    }

    /// Requests addressed to the current user that are still pending
    pub async fn pending_requests(&self) -> Result<Vec<RelationshipRequest>, ApiError> {
        let envelope = self.remote.fetch(PENDING_REQUESTS_PATH, &[]).await?;
        Ok(envelope
            .decode::<Vec<RelationshipRequest>>()?
            .data
            .unwrap_or_default())
    }

    /// Accept or delete the request sent by `user_id`
    pub async fn respond_to_request(
        &self,
        action: RelationshipAction,
        user_id: &UserId,
    ) -> Result<Envelope, ApiError> {
        let body = serde_json::to_value(RelationshipActionRequest {
            user_id: user_id.clone(),
        })?;
        let (method, path) = match action {
            RelationshipAction::Accept => (Method::POST, ACCEPT_REQUEST_PATH),
            RelationshipAction::Delete => (Method::DELETE, DELETE_REQUEST_PATH),
        };
        self.remote.mutate(method, path, body).await
    }

    pub async fn accept_request(&self, user_id: &UserId) -> Result<Envelope, ApiError> {
        self.respond_to_request(RelationshipAction::Accept, user_id)
            .await
    }

    pub async fn delete_request(&self, user_id: &UserId) -> Result<Envelope, ApiError> {
        self.respond_to_request(RelationshipAction::Delete, user_id)
            .await
    }
}
