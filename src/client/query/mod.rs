//! # Query Cache
//!
//! Keyed cache of remote reads shared by every view of the application.
//!
//! ## Features
//!
//! - **Deduplication**: one in-flight fetch per key; late callers join it
//! - **Invalidation**: prefix-based, wakes every subscriber of a matching key
//! - **Isolation**: a failed key never touches any other key
//! - **Explicit lifecycle**: created by the app context, torn down with `shutdown`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatlink::client::query::{QueryCache, QueryKey};
//! use chatlink::shared::ApiError;
//!
//! # async fn example() {
//! let cache = QueryCache::new();
//! let key = QueryKey::new("pendingRequests").with("u1");
//!
//! let result = cache.get(&key, || async { Ok::<_, ApiError>(vec!["r1".to_string()]) }).await;
//! assert!(result.is_success());
//!
//! // After a mutation: every "pendingRequests/*" entry refetches on next read
//! cache.invalidate(&QueryKey::new("pendingRequests")).await;
//! # }
//! ```

mod key;

pub use key::QueryKey;

use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::{watch, Mutex};

use crate::shared::error::ApiError;

type AnyData = Arc<dyn Any + Send + Sync>;

/// Lifecycle of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Type-erased state of one entry, as broadcast to subscribers
#[derive(Clone)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    data: Option<AnyData>,
    pub error: Option<ApiError>,
    /// Set by invalidation; the next `get` refetches
    pub stale: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl QuerySnapshot {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            stale: false,
            updated_at: None,
        }
    }

    /// Typed view of the cached data, `None` if absent or of another type
    pub fn data<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.data
            .as_ref()
            .and_then(|data| Arc::clone(data).downcast::<T>().ok())
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

impl fmt::Debug for QuerySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySnapshot")
            .field("status", &self.status)
            .field("has_data", &self.data.is_some())
            .field("error", &self.error)
            .field("stale", &self.stale)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Outcome of [`QueryCache::get`]
#[derive(Debug, Clone)]
pub struct QueryResult<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<ApiError>,
}

impl<T: Send + Sync + 'static> QueryResult<T> {
    fn from_snapshot(snapshot: &QuerySnapshot) -> Self {
        match (snapshot.status, snapshot.data::<T>()) {
            (QueryStatus::Success, None) if snapshot.has_data() => {
                Self::failed(ApiError::decode("cached data has a different type"))
            }
            (status, data) => Self {
                status,
                data,
                error: snapshot.error.clone(),
            },
        }
    }

    fn failed(error: ApiError) -> Self {
        Self {
            status: QueryStatus::Error,
            data: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Collapse into a `Result`
    pub fn into_result(self) -> Result<Arc<T>, ApiError> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(error),
            (None, None) => Err(ApiError::decode("query settled without data")),
        }
    }
}

/// Change stream for one key
pub struct QuerySubscription {
    rx: watch::Receiver<QuerySnapshot>,
}

impl QuerySubscription {
    /// Current state without waiting
    pub fn current(&self) -> QuerySnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. `None` once the cache is shut down.
    pub async fn changed(&mut self) -> Option<QuerySnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

struct Entry {
    tx: watch::Sender<QuerySnapshot>,
    generation: u64,
}

impl Entry {
    fn new() -> Self {
        let (tx, _) = watch::channel(QuerySnapshot::idle());
        Self { tx, generation: 0 }
    }

    fn status(&self) -> QueryStatus {
        self.tx.borrow().status
    }
}

struct CacheInner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    generation: AtomicU64,
    closed: AtomicBool,
}

impl CacheInner {
    async fn complete(&self, key: &QueryKey, generation: u64, result: Result<AnyData, ApiError>) {
        let entries = self.entries.lock().await;
        let Some(entry) = entries.get(key).filter(|entry| entry.generation == generation) else {
            tracing::debug!(%key, generation, "discarding result for evicted entry");
            return;
        };

        entry.tx.send_modify(|state| {
            state.updated_at = Some(Utc::now());
            match result {
                Ok(data) => {
                    tracing::debug!(%key, "fetch succeeded");
                    state.status = QueryStatus::Success;
                    state.data = Some(data);
                    state.error = None;
                }
                Err(error) => {
                    tracing::warn!(%key, %error, "fetch failed");
                    state.status = QueryStatus::Error;
                    state.data = None;
                    state.error = Some(error);
                }
            }
        });
    }
}

/// Shared query cache handle. Clones refer to the same cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Read `key`, running `fetcher` only if there is no fresh data and no fetch in flight.
    ///
    /// The fetch runs on its own task, so it settles (and is cached) even if every
    /// caller stops waiting.
    pub async fn get<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> QueryResult<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let mut rx = {
            let mut entries = self.inner.entries.lock().await;
            if self.is_shut_down() {
                return QueryResult::failed(ApiError::Cancelled);
            }

            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            let snapshot = entry.tx.borrow().clone();
            match snapshot.status {
                QueryStatus::Success if !snapshot.stale => {
                    tracing::trace!(%key, "cache hit");
                    return QueryResult::from_snapshot(&snapshot);
                }
                // Invalidated mid-flight: the running fetch may predate the write,
                // so supersede it. Its late result fails the generation check.
                QueryStatus::Loading if !snapshot.stale => {
                    tracing::trace!(%key, "joining in-flight fetch");
                }
                _ => self.start_fetch(key, entry, fetcher()),
            }
            entry.tx.subscribe()
        };

        let result = match rx.wait_for(|state| state.status != QueryStatus::Loading).await {
            Ok(snapshot) => QueryResult::from_snapshot(&snapshot),
            Err(_) => QueryResult::failed(ApiError::Cancelled),
        };
        result
    }

    fn start_fetch<T, Fut>(&self, key: &QueryKey, entry: &mut Entry, fetch: Fut)
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        entry.generation = generation;
        entry.tx.send_modify(|state| {
            state.status = QueryStatus::Loading;
            state.stale = false;
            state.error = None;
        });
        tracing::debug!(%key, generation, "fetch started");

        let inner: Weak<CacheInner> = Arc::downgrade(&self.inner);
        let key = key.clone();
        tokio::spawn(async move {
            let result = fetch.await.map(|data| Arc::new(data) as AnyData);
            if let Some(inner) = inner.upgrade() {
                inner.complete(&key, generation, result).await;
            }
        });
    }

    /// Mark every entry under `prefix` stale and notify its subscribers.
    ///
    /// Returns how many entries matched; matching nothing is not an error.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let entries = self.inner.entries.lock().await;
        let mut matched = 0;
        for (key, entry) in entries.iter().filter(|(key, _)| key.starts_with(prefix)) {
            entry.tx.send_modify(|state| state.stale = true);
            tracing::debug!(%key, subscribers = entry.tx.receiver_count(), "invalidated");
            matched += 1;
        }
        matched
    }

    /// Subscribe to changes of `key`, creating an idle entry if needed
    pub async fn subscribe(&self, key: &QueryKey) -> QuerySubscription {
        let mut entries = self.inner.entries.lock().await;
        let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
        QuerySubscription {
            rx: entry.tx.subscribe(),
        }
    }

    /// Current state of `key` without fetching
    pub async fn peek(&self, key: &QueryKey) -> Option<QuerySnapshot> {
        let entries = self.inner.entries.lock().await;
        entries.get(key).map(|entry| entry.tx.borrow().clone())
    }

    pub async fn len(&self) -> usize {
        self.inner.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop settled entries that nobody subscribes to
    pub async fn collect_garbage(&self) -> usize {
        let mut entries = self.inner.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| {
            entry.tx.receiver_count() > 0 || entry.status() == QueryStatus::Loading
        });
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "collected unobserved cache entries");
        }
        removed
    }

    /// Tear the cache down. Waiting callers resolve with `Cancelled` and late
    /// fetch results are discarded.
    pub async fn shutdown(&self) {
        let mut entries = self.inner.entries.lock().await;
        self.inner.closed.store(true, Ordering::SeqCst);
        tracing::debug!(entries = entries.len(), "query cache shut down");
        entries.clear();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}
