//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Programmer errors at dispatch/slice time       │
//! │  └── ValidationError  - Constructor/config input failures              │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                   │
//! │  ├── FetchError       - Captured in store state, never returned        │
//! │  └── StoreError       - Config and logging setup failures              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation Policy
//! A remote failure is a runtime condition and belongs in observable store
//! state. Everything in this file is a programming error (unknown action tag,
//! wrong input shape) and is returned to the caller immediately so it shows
//! up in development instead of silently misbehaving.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by reducers and the pagination slicer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A reducer received an action tag it does not recognize.
    ///
    /// ## When This Occurs
    /// - Frontend dispatched `{ "type": "RESET" }` to the pagination reducer
    /// - The action object has no `type` field at all
    #[error("{reducer} reducer received unknown action '{action}'")]
    InvalidAction {
        reducer: &'static str,
        action: String,
    },

    /// A known action tag arrived with a payload that does not decode.
    ///
    /// ## When This Occurs
    /// - `{ "type": "CHANGE_ROWS_PER_PAGE", "rowsPerPage": 0 }`
    /// - `{ "type": "CHANGE_PAGE" }` with the page missing
    #[error("{reducer} reducer received malformed '{action}' action: {reason}")]
    MalformedAction {
        reducer: &'static str,
        action: String,
        reason: String,
    },

    /// The slicer was given something that is not a linear sequence.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a state constructor or a configuration value does not
/// meet requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidAction {
            reducer: "pagination",
            action: "RESET".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "pagination reducer received unknown action 'RESET'"
        );

        let err = CoreError::InvalidInput {
            reason: "expected an array, got object".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid input: expected an array, got object");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "rowsPerPage".to_string(),
        };
        assert_eq!(err.to_string(), "rowsPerPage must be positive");

        let err = ValidationError::Required {
            field: "rowsPerPageOptions".to_string(),
        };
        assert_eq!(err.to_string(), "rowsPerPageOptions is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "rowsPerPage".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
