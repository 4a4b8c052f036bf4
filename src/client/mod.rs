//! Client Module
//!
//! Everything a front end needs to drive the social features of the chat service:
//!
//! - **`api`** / **`social_api`** - authenticated HTTP transport and typed endpoints
//! - **`query`** - keyed, deduplicating cache of remote reads
//! - **`mutation`** - single-flight writes that invalidate dependent reads
//! - **`search`** - the user search modal
//! - **`relationships`** - the pending requests panel
//! - **`chat_list`** - id-unique chat list and the active chat
//! - **`app`** - the context that owns all of the above

pub mod api;
pub mod app;
pub mod chat_list;
pub mod config;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod relationships;
pub mod search;
pub mod session;
pub mod social_api;

pub use api::{HttpApi, RemoteApi};
pub use app::AppContext;
pub use chat_list::{ChatContext, EntityList, Identified, Upsert};
pub use config::Config;
pub use mutation::{MutationError, MutationExecutor, MutationStatus};
pub use notify::{ChannelNotifier, Notification, NotificationSink, Severity, TracingNotifier};
pub use query::{QueryCache, QueryKey, QueryResult, QueryStatus};
pub use relationships::{PendingRequests, PendingRow, PendingView};
pub use search::{SearchModal, SearchPhase, SearchState};
pub use session::{SessionProvider, StaticSession};
pub use social_api::SocialApi;
