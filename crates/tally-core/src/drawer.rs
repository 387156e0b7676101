//! # Entity Drawer
//!
//! Visibility and payload of the side panel used to create or edit one
//! entity (a category, a payment method, ...).
//!
//! ## State Machine
//! ```text
//!                 open(p?)                       toggle
//!   ┌──────────┐ ────────► ┌─────────────────┐ ◄──────┐
//!   │  hidden  │           │      shown      │        │
//!   │ payload  │ ◄──────── │ payload = p?    │ ───────┘
//!   └──────────┘  close /  └─────────────────┘
//!                 toggle
//! ```
//! Only `open` touches the payload. Hiding the drawer keeps whatever it was
//! editing, so toggling it back shows the same entity.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::reducer::Reducer;

/// Drawer state owned by an editable-entity view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EntityDrawerState<T> {
    pub shown: bool,
    pub payload: Option<T>,
}

impl<T> EntityDrawerState<T> {
    /// Hidden drawer with no payload.
    pub fn new() -> Self {
        EntityDrawerState {
            shown: false,
            payload: None,
        }
    }

    /// Shown with an entity loaded: the panel edits it.
    pub fn is_editing(&self) -> bool {
        self.shown && self.payload.is_some()
    }

    /// Shown with nothing loaded: the panel creates a new entity.
    pub fn is_creating(&self) -> bool {
        self.shown && self.payload.is_none()
    }
}

impl<T> Default for EntityDrawerState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Actions accepted by the drawer reducer.
///
/// Raw form:
/// ```json
/// { "type": "open", "payload": { "id": 7 } }
/// { "type": "open" }
/// { "type": "toggle" }
/// { "type": "close" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export)]
pub enum DrawerAction<T> {
    /// Show the drawer, replacing the payload (`None` when absent).
    Open { payload: Option<T> },

    /// Flip visibility.
    Toggle,

    /// Hide the drawer.
    Close,
}

impl<T> DrawerAction<T> {
    /// `open` with an entity to edit.
    pub fn open(payload: T) -> Self {
        DrawerAction::Open {
            payload: Some(payload),
        }
    }

    /// `open` for creating a new entity.
    pub fn open_empty() -> Self {
        DrawerAction::Open { payload: None }
    }
}

/// Applies a drawer action.
pub fn reduce<T>(state: EntityDrawerState<T>, action: DrawerAction<T>) -> EntityDrawerState<T> {
    match action {
        DrawerAction::Open { payload } => EntityDrawerState {
            shown: true,
            payload,
        },
        DrawerAction::Toggle => EntityDrawerState {
            shown: !state.shown,
            ..state
        },
        DrawerAction::Close => EntityDrawerState {
            shown: false,
            ..state
        },
    }
}

/// Parses a raw frontend action and applies it.
pub fn reduce_value<T: DeserializeOwned>(
    state: EntityDrawerState<T>,
    raw: &Value,
) -> CoreResult<EntityDrawerState<T>> {
    DrawerReducer::<T>::reduce_value(state, raw)
}

/// [`Reducer`] implementation for a drawer editing `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawerReducer<T>(PhantomData<T>);

impl<T: DeserializeOwned> Reducer for DrawerReducer<T> {
    type State = EntityDrawerState<T>;
    type Action = DrawerAction<T>;

    const NAME: &'static str = "entityDrawer";
    const ACTION_TYPES: &'static [&'static str] = &["open", "toggle", "close"];

    fn initial_state() -> EntityDrawerState<T> {
        EntityDrawerState::new()
    }

    fn reduce(state: EntityDrawerState<T>, action: DrawerAction<T>) -> EntityDrawerState<T> {
        reduce(state, action)
    }
}
