//! # Pagination
//!
//! The pagination cursor of list views and the slicer that turns it into the
//! rows actually rendered.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pagination Reducer                                   │
//! │                                                                         │
//! │  Action                          Effect                                 │
//! │  ──────                          ──────                                 │
//! │  CHANGE_PAGE(n)            ───►  page := n                              │
//! │                                  rowsPerPage unchanged                  │
//! │                                                                         │
//! │  CHANGE_ROWS_PER_PAGE(n)   ───►  rowsPerPage := n                       │
//! │                                  page := 0                              │
//! │                                                                         │
//! │  anything else             ───►  CoreError::InvalidAction               │
//! │                                                                         │
//! │  NOTE: page is never checked against the dataset here. A page past     │
//! │        the end is the slicer's business and renders as empty.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Slicing
//! ```text
//! data:  [ a b | c d | e ]      rowsPerPage = 2
//!          p0    p1    p2
//!
//! paginate(data, { page: 1 })  = [ c d ]
//! paginate(data, { page: 2 })  = [ e ]
//! paginate(data, { page: 9 })  = [ ]
//! ```

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::reducer::Reducer;
use crate::validation::validate_rows_per_page;
use crate::DEFAULT_ROWS_PER_PAGE;

// =============================================================================
// Pagination State
// =============================================================================

/// Cursor of a paginated list view.
///
/// ## Invariants
/// - `rows_per_page > 0` (enforced by the type)
/// - changing `rows_per_page` resets `page` to 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaginationState {
    /// Zero-based page index.
    pub page: usize,

    /// Rows per page.
    #[ts(type = "number")]
    pub rows_per_page: NonZeroUsize,
}

impl PaginationState {
    /// Creates a pagination state, validating `rows_per_page`.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::PaginationState;
    ///
    /// let state = PaginationState::new(3, 10).unwrap();
    /// assert_eq!(state.page, 3);
    /// assert!(PaginationState::new(0, 0).is_err());
    /// ```
    pub fn new(page: usize, rows_per_page: usize) -> CoreResult<Self> {
        Ok(PaginationState {
            page,
            rows_per_page: validate_rows_per_page(rows_per_page)?,
        })
    }

    /// The state a list view starts from: first page, default page size.
    pub fn initial() -> Self {
        Self::default()
    }

    /// First page with the given page size.
    pub fn with_rows_per_page(rows_per_page: NonZeroUsize) -> Self {
        PaginationState {
            page: 0,
            rows_per_page,
        }
    }

    /// Rows per page as a plain `usize`.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows_per_page.get()
    }

    /// Index of the first row of the current page (saturating).
    #[inline]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.rows())
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        PaginationState {
            page: 0,
            rows_per_page: NonZeroUsize::new(DEFAULT_ROWS_PER_PAGE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

// =============================================================================
// Pagination Actions
// =============================================================================

/// Actions accepted by the pagination reducer.
///
/// Raw form (as sent by the frontend):
/// ```json
/// { "type": "CHANGE_PAGE", "page": 2 }
/// { "type": "CHANGE_ROWS_PER_PAGE", "rowsPerPage": 25 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PaginationAction {
    /// Jump to a page.
    ChangePage { page: usize },

    /// Change the page size; always goes back to the first page.
    ChangeRowsPerPage {
        #[serde(rename = "rowsPerPage")]
        #[ts(type = "number")]
        rows_per_page: NonZeroUsize,
    },
}

// =============================================================================
// Reducer
// =============================================================================

/// Applies a pagination action. Total over typed actions.
pub fn reduce(state: PaginationState, action: PaginationAction) -> PaginationState {
    match action {
        PaginationAction::ChangePage { page } => PaginationState { page, ..state },
        PaginationAction::ChangeRowsPerPage { rows_per_page } => {
            PaginationState::with_rows_per_page(rows_per_page)
        }
    }
}

/// Parses a raw frontend action and applies it.
///
/// ## Errors
/// - [`CoreError::InvalidAction`] for a missing or unknown `type`
/// - [`CoreError::MalformedAction`] for a known `type` with a bad payload
pub fn reduce_value(state: PaginationState, raw: &Value) -> CoreResult<PaginationState> {
    PaginationReducer::reduce_value(state, raw)
}

/// [`Reducer`] implementation for list views.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationReducer;

impl Reducer for PaginationReducer {
    type State = PaginationState;
    type Action = PaginationAction;

    const NAME: &'static str = "pagination";
    const ACTION_TYPES: &'static [&'static str] = &["CHANGE_PAGE", "CHANGE_ROWS_PER_PAGE"];

    fn initial_state() -> PaginationState {
        PaginationState::initial()
    }

    fn reduce(state: PaginationState, action: PaginationAction) -> PaginationState {
        reduce(state, action)
    }
}

// =============================================================================
// Page Window
// =============================================================================

/// The row range a pagination state selects out of `total` rows.
///
/// `start..end` is always within `0..=total`; both collapse to `total` when
/// the page lies past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub total: usize,
    rows_per_page: usize,
    page: usize,
}

impl PageWindow {
    /// Computes the window of `state` over a dataset of `total` rows.
    pub fn new(total: usize, state: &PaginationState) -> Self {
        let rows = state.rows();
        let start = state.offset().min(total);
        let end = start.saturating_add(rows).min(total);

        PageWindow {
            start,
            end,
            total,
            rows_per_page: rows,
            page: state.page,
        }
    }

    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the window selects no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of pages needed to show every row.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.rows_per_page)
    }

    /// True if rows exist after this window.
    pub fn has_next(&self) -> bool {
        self.end < self.total
    }

    /// True if the window is past the first page.
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

/// Footer label for list views: `"11-20 of 57"`, `"0-0 of 0"` when empty.
impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "0-0 of {}", self.total)
        } else {
            write!(f, "{}-{} of {}", self.start + 1, self.end, self.total)
        }
    }
}

// =============================================================================
// Slicer
// =============================================================================

/// Returns the rows of the current page.
///
/// The result borrows from `data`, so calling this twice with the same inputs
/// yields the same slice. A page past the end yields an empty slice.
///
/// ## Example
/// ```rust
/// use tally_core::{paginate, PaginationState};
///
/// let state = PaginationState::new(1, 2).unwrap();
/// assert_eq!(paginate(&[1, 2, 3, 4, 5], &state), &[3, 4]);
///
/// let past_end = PaginationState::new(7, 2).unwrap();
/// assert!(paginate(&[1, 2, 3, 4, 5], &past_end).is_empty());
/// ```
pub fn paginate<'a, T>(data: &'a [T], state: &PaginationState) -> &'a [T] {
    let window = PageWindow::new(data.len(), state);
    &data[window.start..window.end]
}

/// Slices a raw JSON dataset.
///
/// ## Errors
/// [`CoreError::InvalidInput`] if `data` is not a JSON array.
pub fn paginate_value(data: &Value, state: &PaginationState) -> CoreResult<Value> {
    match data {
        Value::Array(rows) => Ok(Value::Array(paginate(rows, state).to_vec())),
        other => Err(CoreError::InvalidInput {
            reason: format!("expected an array, got {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(page: usize, rows_per_page: usize) -> PaginationState {
        PaginationState::new(page, rows_per_page).unwrap()
    }

    #[test]
    fn test_change_page_keeps_rows_per_page() {
        let next = reduce(state(0, 25), PaginationAction::ChangePage { page: 4 });
        assert_eq!(next, state(4, 25));
    }

    #[test]
    fn test_change_rows_per_page_resets_page() {
        let next = reduce_value(
            state(3, 10),
            &json!({ "type": "CHANGE_ROWS_PER_PAGE", "rowsPerPage": 25 }),
        )
        .unwrap();
        assert_eq!(next, state(0, 25));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let err = reduce_value(state(2, 10), &json!({ "type": "unknown" })).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidAction {
                reducer: "pagination",
                action: "unknown".to_string()
            }
        );
    }

    #[test]
    fn test_zero_rows_per_page_is_malformed() {
        let err = reduce_value(
            state(0, 10),
            &json!({ "type": "CHANGE_ROWS_PER_PAGE", "rowsPerPage": 0 }),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::MalformedAction { .. }));
    }

    #[test]
    fn test_reducer_does_not_clamp_pages() {
        let next = reduce(state(0, 10), PaginationAction::ChangePage { page: 500 });
        assert_eq!(next.page, 500);
    }

    #[test]
    fn test_initial_state() {
        let initial = PaginationReducer::initial_state();
        assert_eq!(initial.page, 0);
        assert_eq!(initial.rows(), DEFAULT_ROWS_PER_PAGE);
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = serde_json::to_value(state(1, 5)).unwrap();
        assert_eq!(json, json!({ "page": 1, "rowsPerPage": 5 }));
    }

    #[test]
    fn test_paginate_scenarios() {
        let data = [1, 2, 3, 4, 5];
        assert_eq!(paginate(&data, &state(0, 2)), &[1, 2]);
        assert_eq!(paginate(&data, &state(1, 2)), &[3, 4]);
        assert_eq!(paginate(&data, &state(2, 2)), &[5]);
        assert!(paginate(&data, &state(3, 2)).is_empty());
        assert!(paginate(&data, &state(usize::MAX, 2)).is_empty());
        assert!(paginate::<u8>(&[], &state(0, 2)).is_empty());
    }

    #[test]
    fn test_paginate_value() {
        let page = paginate_value(&json!(["a", "b", "c"]), &state(1, 2)).unwrap();
        assert_eq!(page, json!(["c"]));

        let err = paginate_value(&json!({ "rows": [] }), &state(0, 2)).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidInput {
                reason: "expected an array, got object".to_string()
            }
        );
    }

    #[test]
    fn test_page_window() {
        let window = PageWindow::new(57, &state(1, 10));
        assert_eq!((window.start, window.end), (10, 20));
        assert_eq!(window.len(), 10);
        assert_eq!(window.page_count(), 6);
        assert!(window.has_next());
        assert!(window.has_previous());
        assert_eq!(window.to_string(), "11-20 of 57");

        let last = PageWindow::new(57, &state(5, 10));
        assert_eq!(last.to_string(), "51-57 of 57");
        assert!(!last.has_next());

        let empty = PageWindow::new(0, &state(0, 10));
        assert!(empty.is_empty());
        assert_eq!(empty.page_count(), 0);
        assert_eq!(empty.to_string(), "0-0 of 0");
    }
}
