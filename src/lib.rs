//! Chatlink - Social Client Library
//!
//! Chatlink is the client side of a chat service's social features: finding users,
//! opening a one-to-one chat with them, and handling incoming friend requests. It is
//! UI-agnostic; a front end renders the view models and forwards user input.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types, error taxonomy and application configuration
//!   - `User`, `RelationshipRequest`, `Chat`, the `{ data, message }` envelope
//!   - `ApiError`, `ConfigError`
//!   - `AppConfig` and its builder
//!
//! - **`client`** - Stateful pieces a front end drives
//!   - Remote data access over `reqwest`
//!   - Query cache with per-key deduplication and prefix invalidation
//!   - Mutation executor, search modal, pending requests panel
//!   - `AppContext` tying them together
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chatlink::client::{AppContext, Config, StaticSession, TracingNotifier};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None)?;
//! let session = Arc::new(StaticSession::signed_in("64f0c2", "token"));
//! let app = AppContext::connect(config, session, Arc::new(TracingNotifier))?;
//!
//! let search = app.search_modal();
//! search.on_input("ann");
//! if let Some(lookup) = search.on_key_release() {
//!     lookup.await?;
//! }
//!
//! app.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! All network work runs on tokio tasks. Views own a cancellation token, so results
//! that arrive after a view is closed are dropped. The query cache runs at most one
//! fetch per key at a time, and the mutation executor runs one write at a time.
//!
//! # Error Handling
//!
//! Remote failures are `ApiError`s. Views turn them into a notification (the server's
//! message when it sent one, a fixed fallback otherwise) plus a local error state with
//! a manual retry. Nothing retries automatically.

/// Shared types and data structures
pub mod shared;

/// Client-side state and remote access
pub mod client;
