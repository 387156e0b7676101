//! # tally-core: Pure Client State for Tally
//!
//! This crate holds the client-state logic that every Tally screen shares,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Client Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (web UI)                            │   │
//! │  │   Category list ──► Payment methods ──► Quotes ──► Edit drawer  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw JSON actions / snapshots           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-store (async cached stores)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │ pagination │  │   drawer   │  │ result_pair│  │validation│  │   │
//! │  │   │  reducer   │  │  reducer   │  │  contract  │  │  rules   │  │   │
//! │  │   │  slicer    │  │            │  │            │  │          │  │   │
//! │  │   └────────────┘  └────────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ASYNC • NO CLOCK • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pagination`] - Pagination reducer and page slicer
//! - [`drawer`] - Entity drawer reducer (create/edit panel)
//! - [`reducer`] - The `Reducer` seam and raw action parsing
//! - [`result_pair`] - The `[value, error]` contract every fetcher honors
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::pagination::{paginate, reduce, PaginationAction, PaginationState};
//!
//! let state = PaginationState::new(0, 2).unwrap();
//! let state = reduce(state, PaginationAction::ChangePage { page: 1 });
//!
//! assert_eq!(paginate(&[1, 2, 3, 4, 5], &state), &[3, 4]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod drawer;
pub mod error;
pub mod pagination;
pub mod reducer;
pub mod result_pair;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use drawer::{DrawerAction, DrawerReducer, EntityDrawerState};
pub use error::{CoreError, CoreResult, ValidationError};
pub use pagination::{
    paginate, paginate_value, PageWindow, PaginationAction, PaginationReducer, PaginationState,
};
pub use reducer::Reducer;
pub use result_pair::ResultPair;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rows shown per page when a list view does not say otherwise.
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Choices offered by the rows-per-page selector of list views.
pub const DEFAULT_ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];
