//! # Result Pair
//!
//! The two-slot outcome the backend services hand back: `[value, error]`,
//! where exactly one side is populated. Stores never see a pair directly;
//! fetchers convert it into a `Result` at the boundary with
//! [`ResultPair::into_result`].

use serde::{Deserialize, Serialize};

/// A `[value, error]` outcome as returned by the remote services.
///
/// ## Contract
/// ```text
/// success:  { value: Some(v), error: None    }
/// failure:  { value: None,    error: Some(e) }
/// ```
/// A pair carrying both sides is read as a failure: the error slot wins.
/// A pair carrying neither side is read as a failure produced by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPair<T, E> {
    pub value: Option<T>,
    pub error: Option<E>,
}

impl<T, E> ResultPair<T, E> {
    /// Successful pair.
    pub fn ok(value: T) -> Self {
        ResultPair {
            value: Some(value),
            error: None,
        }
    }

    /// Failed pair.
    pub fn err(error: E) -> Self {
        ResultPair {
            value: None,
            error: Some(error),
        }
    }

    /// True if the pair holds a value and no error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.value.is_some()
    }

    /// True if the pair does not represent a success.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Collapses the pair into a `Result`.
    ///
    /// `on_empty` builds the error for a pair that has neither slot set.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::ResultPair;
    ///
    /// let pair: ResultPair<u32, String> = ResultPair::ok(7);
    /// assert_eq!(pair.into_result(|| "empty".to_string()), Ok(7));
    ///
    /// let pair: ResultPair<u32, String> = ResultPair { value: None, error: None };
    /// assert_eq!(pair.into_result(|| "empty".to_string()), Err("empty".to_string()));
    /// ```
    pub fn into_result(self, on_empty: impl FnOnce() -> E) -> Result<T, E> {
        match (self.value, self.error) {
            (_, Some(error)) => Err(error),
            (Some(value), None) => Ok(value),
            (None, None) => Err(on_empty()),
        }
    }
}

impl<T, E> From<Result<T, E>> for ResultPair<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ResultPair::ok(value),
            Err(error) => ResultPair::err(error),
        }
    }
}
