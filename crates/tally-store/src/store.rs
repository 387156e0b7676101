//! # Generic Store
//!
//! A cached, observable container around one [`Fetcher`]. Every feature that
//! shows a remote collection (price quotes, payment methods, categories)
//! creates exactly one `Store` and shares it between all of its views.
//!
//! ## Fetch Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        refetch() lifecycle                              │
//! │                                                                         │
//! │  refetch() ──► in-flight slot empty?                                    │
//! │                    │                                                    │
//! │          yes ◄─────┴─────► no: join the in-flight fetch                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  is_loading = true, spawn fetch task                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  (task) notify ──► fetcher.fetch().await                                │
//! │           │                                                             │
//! │     Ok(value)                         Err(error)                        │
//! │     ─────────                         ──────────                        │
//! │     data = value                      data kept                         │
//! │     error = None                      error = Some(error)               │
//! │     fetched_at = now                  fetched_at kept                   │
//! │           │                                │                            │
//! │           └──────────────┬─────────────────┘                            │
//! │                          ▼                                              │
//! │  is_loading = false, slot cleared ──► notify (once)                     │
//! │                                                                         │
//! │  Every caller, first or joined, resumes after this point.               │
//! │  Dropping a caller never cancels the task. If the fetcher panics the    │
//! │  task still clears the slot and `is_loading` before callers re-panic.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! Lock order is `in_flight` then `state`. No lock is held across an
//! `.await` or while listeners run, so listeners may read the store, call
//! `set_data`, or start another `refetch`.
//!
//! ## Usage
//! ```rust
//! use tally_store::{FetchError, Store};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let categories = Store::collection("categories", || async {
//!     Ok::<_, FetchError>(vec![Some("Groceries"), None, Some("Rent")])
//! });
//!
//! categories.refetch().await;
//! assert_eq!(categories.data(), vec!["Groceries", "Rent"]);
//! # }
//! ```

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn, Instrument};
use ts_rs::TS;
use uuid::Uuid;

use crate::config::StoreSettings;
use crate::error::FetchError;
use crate::fetcher::{with_timeout, CompactFetcher, FetchResult, Fetcher};

type Listener<T> = Arc<dyn Fn(&StoreSnapshot<T>) + Send + Sync>;
/// Resolves to the fetcher's panic message if the fetch task panicked.
type InFlight = Shared<BoxFuture<'static, Option<Arc<str>>>>;

// =============================================================================
// Snapshot & Status
// =============================================================================

/// Owned copy of a store's state, handed to listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<FetchError>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> StoreSnapshot<T> {
    /// Summarises the snapshot for rendering.
    pub fn status(&self) -> StoreStatus {
        StoreStatus::of(self.is_loading, self.error.is_some(), self.fetched_at.is_some())
    }
}

/// What a view should render for a store.
///
/// ```text
/// Idle ──refetch──► Loading ──ok──► Ready
///                      │
///                      └──err──► Failed   (cached data still shown)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum StoreStatus {
    /// Never fetched, nothing in flight.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed.
    Failed,
}

impl StoreStatus {
    fn of(is_loading: bool, has_error: bool, has_fetched: bool) -> Self {
        if is_loading {
            StoreStatus::Loading
        } else if has_error {
            StoreStatus::Failed
        } else if has_fetched {
            StoreStatus::Ready
        } else {
            StoreStatus::Idle
        }
    }
}

// =============================================================================
// Subscription
// =============================================================================

trait RemoveListener: Send + Sync {
    fn remove_listener(&self, id: u64) -> bool;
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping it leaves the listener registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[must_use = "the listener stays registered until unsubscribe() is called"]
pub struct Subscription {
    id: u64,
    store: Weak<dyn RemoveListener>,
}

impl Subscription {
    /// Removes the listener. Returns false if the store is gone or the
    /// listener was already removed.
    pub fn unsubscribe(self) -> bool {
        match self.store.upgrade() {
            Some(store) => store.remove_listener(self.id),
            None => false,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

// =============================================================================
// Store
// =============================================================================

struct StoreState<T> {
    data: T,
    is_loading: bool,
    error: Option<FetchError>,
    fetched_at: Option<DateTime<Utc>>,
}

struct StoreInner<T> {
    id: Uuid,
    name: String,
    fetcher: Box<dyn Fetcher<T>>,
    in_flight: Mutex<Option<InFlight>>,
    state: RwLock<StoreState<T>>,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    next_listener_id: AtomicU64,
}

/// Cached, observable result of a fetcher.
///
/// Cloning is cheap and yields another handle to the same store.
///
/// ## Invariants
/// - At most one fetch is in flight; overlapping `refetch` calls share it
/// - A failed fetch keeps the cached `data`; only success or `set_data`
///   replaces it
/// - Listeners are notified once when a fetch starts and once when it ends
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Store {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.inner.name)
            .field("id", &self.inner.id)
            .finish_non_exhaustive()
    }
}

impl<T> Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a store holding `initial` until the first successful fetch.
    ///
    /// Nothing is fetched here; call [`ensure_loaded`](Self::ensure_loaded)
    /// or [`refetch`](Self::refetch).
    pub fn new(name: impl Into<String>, fetcher: impl Fetcher<T> + 'static, initial: T) -> Self {
        Self::from_boxed(name.into(), Box::new(fetcher), initial)
    }

    /// Like [`new`](Self::new), applying the configured fetch timeout.
    pub fn with_settings(
        name: impl Into<String>,
        fetcher: impl Fetcher<T> + 'static,
        initial: T,
        settings: &StoreSettings,
    ) -> Self {
        Self::from_boxed(name.into(), apply_settings(fetcher, settings), initial)
    }

    fn from_boxed(name: String, fetcher: Box<dyn Fetcher<T>>, initial: T) -> Self {
        let id = Uuid::new_v4();
        debug!(store = %name, store_id = %id, "Store created");

        Store {
            inner: Arc::new(StoreInner {
                id,
                name,
                fetcher,
                in_flight: Mutex::new(None),
                state: RwLock::new(StoreState {
                    data: initial,
                    is_loading: false,
                    error: None,
                    fetched_at: None,
                }),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Name given at creation.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Instance identifier used in logs.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Current cached data. Never waits for or starts a fetch.
    pub fn data(&self) -> T {
        self.inner.state.read().data.clone()
    }

    /// Runs `f` against the cached data without cloning it.
    ///
    /// `f` runs under the read lock and must not write to this store.
    pub fn with_data<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.state.read().data)
    }

    /// True while a fetch is in flight.
    pub fn is_fetching(&self) -> bool {
        self.inner.state.read().is_loading
    }

    /// Error of the last fetch, if it failed.
    pub fn error(&self) -> Option<FetchError> {
        self.inner.state.read().error.clone()
    }

    /// When `data` was last replaced by a successful fetch.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.read().fetched_at
    }

    /// Copy of the whole state.
    pub fn snapshot(&self) -> StoreSnapshot<T> {
        self.inner.snapshot()
    }

    /// Render status of the store.
    pub fn status(&self) -> StoreStatus {
        let state = self.inner.state.read();
        StoreStatus::of(state.is_loading, state.error.is_some(), state.fetched_at.is_some())
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetches fresh data, or joins the fetch already in flight.
    ///
    /// Fetch failures are never returned: they end up in
    /// [`error`](Self::error) while the cached data stays in place.
    ///
    /// The fetch runs on its own tokio task. Dropping the returned future
    /// stops waiting for it but does not cancel it.
    ///
    /// ## Panics
    /// Re-raises a panic from the fetcher, after the store has left the
    /// loading state. Must be called from within a tokio runtime.
    pub async fn refetch(&self) {
        let fetch = self.join_or_start();
        if let Some(message) = fetch.await {
            panic!("store '{}' fetcher panicked: {}", self.inner.name, message);
        }
    }

    /// Performs the initial fetch if the store is still [`StoreStatus::Idle`],
    /// joins the fetch in flight if there is one, and otherwise returns.
    ///
    /// A failed store is not retried here; retrying is an explicit
    /// [`refetch`](Self::refetch).
    pub async fn ensure_loaded(&self) {
        match self.status() {
            StoreStatus::Idle | StoreStatus::Loading => self.refetch().await,
            StoreStatus::Ready | StoreStatus::Failed => {}
        }
    }

    fn join_or_start(&self) -> InFlight {
        let mut slot = self.inner.in_flight.lock();
        if let Some(fetch) = slot.as_ref() {
            debug!(store = %self.inner.name, "Joining in-flight fetch");
            return fetch.clone();
        }

        self.inner.state.write().is_loading = true;
        let task = tokio::spawn(Arc::clone(&self.inner).run_fetch());

        let fetch = async move {
            match task.await {
                Ok(()) => None,
                Err(err) => err.try_into_panic().ok().map(|payload| panic_message(&*payload)),
            }
        }
        .boxed()
        .shared();

        *slot = Some(fetch.clone());
        fetch
    }

    // =========================================================================
    // Local Writes
    // =========================================================================

    /// Replaces the cached data without fetching (optimistic update).
    ///
    /// Loading flag, error, and `fetched_at` are left as they are.
    pub fn set_data(&self, value: T) {
        self.inner.state.write().data = value;
        self.inner.notify();
    }

    /// Mutates the cached data in place (optimistic update).
    ///
    /// `f` runs under the write lock and must not touch this store.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.state.write().data);
        self.inner.notify();
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers a listener called on every state change, in subscription
    /// order. It is not called until the next change.
    pub fn subscribe(
        &self,
        listener: impl Fn(&StoreSnapshot<T>) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener<T> = Arc::new(listener);
        self.inner.listeners.lock().push((id, listener));

        let store: Weak<StoreInner<T>> = Arc::downgrade(&self.inner);
        let store: Weak<dyn RemoveListener> = store;
        Subscription { id, store }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

impl<U> Store<Vec<U>>
where
    U: Clone + Send + Sync + 'static,
{
    /// Creates an initially empty collection store.
    ///
    /// `None` entries in a successful fetch are dropped before caching.
    pub fn collection(
        name: impl Into<String>,
        fetcher: impl Fetcher<Vec<Option<U>>> + 'static,
    ) -> Self {
        Self::new(name, CompactFetcher::new(fetcher), Vec::new())
    }

    /// Like [`collection`](Self::collection), applying the configured fetch timeout.
    pub fn collection_with_settings(
        name: impl Into<String>,
        fetcher: impl Fetcher<Vec<Option<U>>> + 'static,
        settings: &StoreSettings,
    ) -> Self {
        Self::with_settings(name, CompactFetcher::new(fetcher), Vec::new(), settings)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Arc<str> {
    if let Some(message) = payload.downcast_ref::<&str>() {
        Arc::from(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Arc::from(message.as_str())
    } else {
        Arc::from("non-string panic payload")
    }
}

fn apply_settings<T, F>(fetcher: F, settings: &StoreSettings) -> Box<dyn Fetcher<T>>
where
    T: Send + 'static,
    F: Fetcher<T> + 'static,
{
    match settings.fetch_timeout() {
        Some(timeout) => Box::new(with_timeout(fetcher, timeout)),
        None => Box::new(fetcher),
    }
}

// =============================================================================
// Internals
// =============================================================================

impl<T> StoreInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn run_fetch(self: Arc<Self>) {
        let span = info_span!("store_fetch", store = %self.name, store_id = %self.id);
        let mut guard = FetchGuard {
            store: &*self,
            finished: false,
        };

        // Only this task clears `is_loading`, so listeners see it set here.
        self.notify();

        let started = Instant::now();
        let result = self.fetcher.fetch().instrument(span.clone()).await;

        let snapshot = span.in_scope(|| self.complete(result, started));
        guard.finished = true;
        self.notify_with(&snapshot);
    }

    /// Records the outcome and returns the terminal snapshot, taken before
    /// another fetch can start.
    fn complete(&self, result: FetchResult<T>, started: Instant) -> StoreSnapshot<T> {
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut slot = self.in_flight.lock();
        let mut state = self.state.write();

        match result {
            Ok(data) => {
                debug!(elapsed_ms, "Fetch succeeded");
                state.data = data;
                state.error = None;
                state.fetched_at = Some(Utc::now());
            }
            Err(error) => {
                warn!(elapsed_ms, %error, "Fetch failed; keeping cached data");
                state.error = Some(error);
            }
        }

        state.is_loading = false;
        *slot = None;
        Self::snapshot_of(&state)
    }

    /// Leaves the loading state after the fetch task panicked or was cancelled.
    fn abandon(&self) -> StoreSnapshot<T> {
        let mut slot = self.in_flight.lock();
        let mut state = self.state.write();

        warn!(store = %self.name, store_id = %self.id, "Fetch abandoned; keeping cached data");
        state.is_loading = false;
        *slot = None;
        Self::snapshot_of(&state)
    }

    fn snapshot(&self) -> StoreSnapshot<T> {
        Self::snapshot_of(&self.state.read())
    }

    fn snapshot_of(state: &StoreState<T>) -> StoreSnapshot<T> {
        StoreSnapshot {
            data: state.data.clone(),
            is_loading: state.is_loading,
            error: state.error.clone(),
            fetched_at: state.fetched_at,
        }
    }

    fn listeners(&self) -> Vec<Listener<T>> {
        self.listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    fn notify(&self) {
        let listeners = self.listeners();
        if listeners.is_empty() {
            return;
        }

        let snapshot = self.snapshot();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn notify_with(&self, snapshot: &StoreSnapshot<T>) {
        for listener in self.listeners() {
            listener(snapshot);
        }
    }
}

/// Resets the store if the fetch task unwinds or is dropped before
/// recording an outcome.
struct FetchGuard<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    store: &'a StoreInner<T>,
    finished: bool,
}

impl<T> Drop for FetchGuard<'_, T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let snapshot = self.store.abandon();
        self.store.notify_with(&snapshot);
    }
}

impl<T: Send + Sync> RemoveListener for StoreInner<T> {
    fn remove_listener(&self, id: u64) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }
}

// =============================================================================
// Tests
// =============================================================================
