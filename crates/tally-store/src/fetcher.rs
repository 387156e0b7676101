//! # Fetchers
//!
//! The only boundary between a store and the network: a zero-argument
//! asynchronous operation yielding either a value or a [`FetchError`].
//!
//! ## Adapters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Fetcher Adapters                                │
//! │                                                                         │
//! │  || async { ... }          any closure returning a FetchResult          │
//! │                                                                         │
//! │  from_pair(f)              closure returning ResultPair<T, FetchError>  │
//! │                            (empty pair → FetchError::EmptyResult)       │
//! │                                                                         │
//! │  with_timeout(f, d)        resolves to FetchError::Timeout after d      │
//! │                                                                         │
//! │  CompactFetcher            Vec<Option<U>> → Vec<U>, used by            │
//! │                            Store::collection                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stores never time out on their own. A caller that needs a deadline wraps
//! the fetcher before handing it over.

use std::future::Future;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tracing::{debug, warn};

use tally_core::ResultPair;

use crate::error::FetchError;

/// Outcome of one fetch.
pub type FetchResult<T> = Result<T, FetchError>;

/// An asynchronous source of `T`.
///
/// Any `Fn() -> impl Future<Output = FetchResult<T>>` closure implements it.
///
/// ## Contract
/// Failures are reported through the returned `Result`. A fetcher that
/// panics has a bug; the panic reaches whoever awaits the fetch.
pub trait Fetcher<T>: Send + Sync {
    /// Starts one fetch.
    fn fetch(&self) -> BoxFuture<'_, FetchResult<T>>;
}

impl<T, F, Fut> Fetcher<T> for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult<T>> + Send + 'static,
{
    fn fetch(&self) -> BoxFuture<'_, FetchResult<T>> {
        self().boxed()
    }
}

// =============================================================================
// Result Pair Adapter
// =============================================================================

/// Fetcher over a service that answers with a [`ResultPair`].
pub struct PairFetcher<F> {
    inner: F,
}

/// Adapts a closure returning a [`ResultPair`].
///
/// ## Example
/// ```rust
/// use tally_core::ResultPair;
/// use tally_store::fetcher::{from_pair, Fetcher};
/// use tally_store::FetchError;
///
/// let fetcher = from_pair(|| async { ResultPair::<u32, FetchError>::ok(3) });
/// # let _ = &fetcher as &dyn Fetcher<u32>;
/// ```
pub fn from_pair<F>(inner: F) -> PairFetcher<F> {
    PairFetcher { inner }
}

impl<T, F, Fut> Fetcher<T> for PairFetcher<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = ResultPair<T, FetchError>> + Send + 'static,
{
    fn fetch(&self) -> BoxFuture<'_, FetchResult<T>> {
        let pair = (self.inner)();
        async move { pair.await.into_result(|| FetchError::EmptyResult) }.boxed()
    }
}

// =============================================================================
// Timeout Adapter
// =============================================================================

/// Fetcher that gives up after a fixed duration.
pub struct TimeoutFetcher<F> {
    inner: F,
    timeout: Duration,
}

/// Wraps `inner` so a fetch resolves to [`FetchError::Timeout`] after `timeout`.
pub fn with_timeout<F>(inner: F, timeout: Duration) -> TimeoutFetcher<F> {
    TimeoutFetcher { inner, timeout }
}

impl<T, F> Fetcher<T> for TimeoutFetcher<F>
where
    T: Send,
    F: Fetcher<T>,
{
    fn fetch(&self) -> BoxFuture<'_, FetchResult<T>> {
        async move {
            match tokio::time::timeout(self.timeout, self.inner.fetch()).await {
                Ok(result) => result,
                Err(_) => {
                    let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                    warn!(millis, "Fetch timed out");
                    Err(FetchError::Timeout { millis })
                }
            }
        }
        .boxed()
    }
}

// =============================================================================
// Collection Compaction
// =============================================================================

/// Drops `None` entries from a successful collection fetch.
///
/// Backs `Store::collection`. Sources occasionally hand back partially-null
/// collections; those entries are removed before caching.
pub struct CompactFetcher<F> {
    inner: F,
}

impl<F> CompactFetcher<F> {
    pub fn new(inner: F) -> Self {
        CompactFetcher { inner }
    }
}

impl<U, F> Fetcher<Vec<U>> for CompactFetcher<F>
where
    U: Send,
    F: Fetcher<Vec<Option<U>>>,
{
    fn fetch(&self) -> BoxFuture<'_, FetchResult<Vec<U>>> {
        async move {
            let rows = self.inner.fetch().await?;
            let fetched = rows.len();
            let compacted: Vec<U> = rows.into_iter().flatten().collect();

            let dropped = fetched - compacted.len();
            if dropped > 0 {
                debug!(dropped, kept = compacted.len(), "Dropped empty entries from collection");
            }

            Ok(compacted)
        }
        .boxed()
    }
}
