//! # tally-store: Generic Async Store
//!
//! Turns any asynchronous fetch function into a cached, observable store.
//! Each feature module creates one store and shares it between its views.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Client Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   Feature modules (quotes, payment methods, categories, ...)    │   │
//! │  │   one Store per feature, shared by its list and drawer views    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-store (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │   store    │  │  fetcher   │  │   config   │  │telemetry │  │   │
//! │  │   │ cache,dedup│◄─│ pair,      │  │ tally.toml │  │ tracing  │  │   │
//! │  │   │ listeners  │  │ timeout    │  │ + env      │  │ init     │  │   │
//! │  │   └────────────┘  └────────────┘  └────────────┘  └──────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │   tally-core: ResultPair, PaginationState, reducers             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - The generic store
//! - [`fetcher`] - The fetcher seam and its adapters
//! - [`config`] - File and environment configuration
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - Fetch and setup errors
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::ResultPair;
//! use tally_store::fetcher::from_pair;
//! use tally_store::{FetchError, Store, StoreStatus};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let quotes = Store::new(
//!     "quotes",
//!     from_pair(|| async { ResultPair::<Vec<u32>, FetchError>::err(FetchError::Unauthorized) }),
//!     Vec::new(),
//! );
//!
//! quotes.ensure_loaded().await;
//! assert_eq!(quotes.status(), StoreStatus::Failed);
//! assert_eq!(quotes.error(), Some(FetchError::Unauthorized));
//! assert!(quotes.data().is_empty());
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod fetcher;
pub mod store;
pub mod telemetry;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::{LoggingSettings, PaginationSettings, StoreSettings, TallyConfig};
pub use error::{FetchError, StoreError, StoreResult};
pub use fetcher::{FetchResult, Fetcher};
pub use store::{Store, StoreSnapshot, StoreStatus, Subscription};
