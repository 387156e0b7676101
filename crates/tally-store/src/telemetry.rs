//! # Telemetry
//!
//! Installs the process-wide tracing subscriber.
//!
//! ## Filter Resolution
//! ```text
//! RUST_LOG set and valid?  ──yes──►  RUST_LOG directives
//!          │
//!          no
//!          ▼
//! LoggingSettings::filter  (default "info,tally=debug")
//! ```

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;
use crate::error::{StoreError, StoreResult};

/// Initializes logging for the application.
///
/// Call once at startup. A second call fails with [`StoreError::Telemetry`]
/// because a global subscriber is already installed.
pub fn init(settings: &LoggingSettings) -> StoreResult<()> {
    let filter = resolve_filter(settings)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(settings.ansi)
        .try_init()
        .map_err(|e| StoreError::Telemetry(e.to_string()))?;

    debug!(filter = %settings.filter, "Logging initialized");
    Ok(())
}

fn resolve_filter(settings: &LoggingSettings) -> StoreResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&settings.filter).map_err(|e| {
        StoreError::Telemetry(format!("Invalid log filter '{}': {}", settings.filter, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let settings = LoggingSettings {
            filter: "tally=verbose".to_string(),
            ansi: false,
        };
        assert!(matches!(init(&settings), Err(StoreError::Telemetry(_))));
    }

    #[test]
    fn test_second_init_fails() {
        let settings = LoggingSettings {
            ansi: false,
            ..LoggingSettings::default()
        };

        // Another test in this binary may have installed the subscriber first.
        let _ = init(&settings);
        assert!(matches!(init(&settings), Err(StoreError::Telemetry(_))));
    }
}
