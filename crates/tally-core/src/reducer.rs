//! # Reducer Seam
//!
//! Every piece of transient UI state in Tally is a pure
//! `(state, action) -> state` function plus an initial state. Views own the
//! state; reducers own nothing.
//!
//! Actions arrive in two shapes:
//! - typed (`PaginationAction`, `DrawerAction<T>`): reducing is total
//! - raw JSON from the frontend (`{ "type": "...", ... }`): the tag is checked
//!   against the reducer's known action types first, so an unknown tag fails
//!   with [`CoreError::InvalidAction`] instead of a generic decode error
//!
//! ## Dispatch Flow
//! ```text
//! raw JSON ──► parse_action::<R>() ──► R::Action ──► R::reduce(state) ──► state
//!                  │
//!                  ├── no / unknown "type"  → CoreError::InvalidAction
//!                  └── bad payload          → CoreError::MalformedAction
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// A pure state machine over an explicit state and action.
pub trait Reducer {
    /// The state this reducer transitions.
    type State;

    /// The actions this reducer accepts.
    type Action: DeserializeOwned;

    /// Name used in error messages.
    const NAME: &'static str;

    /// Every `"type"` tag the raw action format may carry.
    const ACTION_TYPES: &'static [&'static str];

    /// The state a freshly mounted view starts from.
    fn initial_state() -> Self::State;

    /// Applies one action.
    fn reduce(state: Self::State, action: Self::Action) -> Self::State;

    /// Parses a raw action and applies it.
    fn reduce_value(state: Self::State, raw: &Value) -> CoreResult<Self::State> {
        let action = parse_action::<Self>(raw)?;
        Ok(Self::reduce(state, action))
    }
}

/// Converts a raw `{ "type": ..., ... }` object into a typed action.
pub fn parse_action<R: Reducer + ?Sized>(raw: &Value) -> CoreResult<R::Action> {
    let tag = match raw.get("type") {
        Some(Value::String(tag)) => tag.as_str(),
        Some(other) => {
            return Err(CoreError::InvalidAction {
                reducer: R::NAME,
                action: other.to_string(),
            })
        }
        None => {
            return Err(CoreError::InvalidAction {
                reducer: R::NAME,
                action: "<missing type>".to_string(),
            })
        }
    };

    if !R::ACTION_TYPES.contains(&tag) {
        return Err(CoreError::InvalidAction {
            reducer: R::NAME,
            action: tag.to_string(),
        });
    }

    serde_json::from_value(raw.clone()).map_err(|e| CoreError::MalformedAction {
        reducer: R::NAME,
        action: tag.to_string(),
        reason: e.to_string(),
    })
}
