//! Current Session
//!
//! Session management lives outside this crate. Components only need to know who the
//! active user is (to scope cache keys) and which bearer token to send.

use std::sync::{Arc, RwLock};

use crate::shared::messaging::UserId;

/// Supplies the identity of the signed-in user
pub trait SessionProvider: Send + Sync {
    /// Id of the active user, `None` when signed out
    fn current_user_id(&self) -> Option<UserId>;

    /// Bearer token for authenticated calls
    fn token(&self) -> Option<String>;
}

/// Session set explicitly by the host application
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    inner: Arc<RwLock<SessionInfo>>,
}

#[derive(Debug, Clone, Default)]
struct SessionInfo {
    user_id: Option<UserId>,
    token: Option<String>,
}

impl StaticSession {
    pub fn new(user_id: Option<UserId>, token: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInfo { user_id, token })),
        }
    }

    pub fn signed_in(user_id: impl Into<UserId>, token: impl Into<String>) -> Self {
        Self::new(Some(user_id.into()), Some(token.into()))
    }

    pub fn set(&self, user_id: Option<UserId>, token: Option<String>) {
        let mut info = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        info.user_id = user_id;
        info.token = token;
    }

    pub fn sign_out(&self) {
        self.set(None, None);
    }
}

impl SessionProvider for StaticSession {
    fn current_user_id(&self) -> Option<UserId> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .user_id
            .clone()
    }

    fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .token
            .clone()
    }
}
