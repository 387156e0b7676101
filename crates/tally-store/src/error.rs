//! # Store Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────────┐ │
//! │  │  FetchError                  │  │  StoreError                      │ │
//! │  │                              │  │                                  │ │
//! │  │  Remote / Unauthorized       │  │  InvalidConfig                   │ │
//! │  │  NotFound / Timeout          │  │  ConfigLoadFailed / SaveFailed   │ │
//! │  │  EmptyResult                 │  │  Telemetry / Core                │ │
//! │  │                              │  │                                  │ │
//! │  │  CAPTURED in store state,    │  │  RETURNED to the caller          │ │
//! │  │  never returned by refetch() │  │  (setup-time failures)           │ │
//! │  └──────────────────────────────┘  └──────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tally_core::CoreError;

/// Result type alias for store setup operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Fetch Error
// =============================================================================

/// Failure reported by a fetcher.
///
/// Stored in the store and shared by every caller that joined the fetch,
/// so it is `Clone`. Serializes for the frontend's error indicator.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FetchError {
    /// The backend answered with an error.
    #[error("Remote request failed: {message}")]
    Remote { message: String },

    /// The session is missing or expired.
    #[error("Not authorized to read this resource")]
    Unauthorized,

    /// The requested resource does not exist.
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// The fetch did not resolve in time (see `fetcher::with_timeout`).
    #[error("Fetch timed out after {millis} ms")]
    Timeout { millis: u64 },

    /// The service returned a result pair with neither slot populated.
    #[error("Fetcher returned neither a value nor an error")]
    EmptyResult,
}

impl FetchError {
    /// Shorthand for [`FetchError::Remote`].
    pub fn remote(message: impl Into<String>) -> Self {
        FetchError::Remote {
            message: message.into(),
        }
    }

    /// Returns true if showing a retry affordance makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Remote { .. } | FetchError::Timeout { .. })
    }
}

// =============================================================================
// Store Error
// =============================================================================

/// Errors raised while setting stores up (configuration, logging).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// The tracing subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Telemetry(String),

    /// Error from the pure core (validation).
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

impl From<tally_core::ValidationError> for StoreError {
    fn from(err: tally_core::ValidationError) -> Self {
        StoreError::InvalidConfig(err.to_string())
    }
}

impl StoreError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidConfig(_)
                | StoreError::ConfigLoadFailed(_)
                | StoreError::ConfigSaveFailed(_)
        )
    }
}
