//! # Tally Configuration
//!
//! Client-side settings shared by every store and list view.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_FETCH_TIMEOUT_MS=15000                                       │
//! │     TALLY_ROWS_PER_PAGE=25                                             │
//! │     TALLY_LOG_FILTER=debug                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $TALLY_CONFIG, or                                                  │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.app/tally.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     no fetch timeout, 10 rows per page, "info,tally=debug"             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # tally.toml
//! [store]
//! fetch_timeout_ms = 15000   # omit for no timeout
//!
//! [pagination]
//! default_rows_per_page = 10
//! rows_per_page_options = [5, 10, 25]
//!
//! [logging]
//! filter = "info,tally=debug"
//! ansi = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tally_core::validation::{validate_rows_per_page, validate_rows_per_page_options};
use tally_core::{PaginationState, DEFAULT_ROWS_PER_PAGE, DEFAULT_ROWS_PER_PAGE_OPTIONS};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Store Settings
// =============================================================================

/// Settings applied to stores built with `Store::with_settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Fetch deadline in milliseconds. `None` lets fetches run forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_ms: Option<u64>,
}

impl StoreSettings {
    /// The fetch deadline, if any.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }
}

// =============================================================================
// Pagination Settings
// =============================================================================

/// Page sizes offered by list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSettings {
    #[serde(default = "default_rows_per_page")]
    pub default_rows_per_page: usize,

    #[serde(default = "default_rows_per_page_options")]
    pub rows_per_page_options: Vec<usize>,
}

fn default_rows_per_page() -> usize {
    DEFAULT_ROWS_PER_PAGE
}

fn default_rows_per_page_options() -> Vec<usize> {
    DEFAULT_ROWS_PER_PAGE_OPTIONS.to_vec()
}

impl Default for PaginationSettings {
    fn default() -> Self {
        PaginationSettings {
            default_rows_per_page: default_rows_per_page(),
            rows_per_page_options: default_rows_per_page_options(),
        }
    }
}

impl PaginationSettings {
    /// Initial pagination state for a list view.
    pub fn initial_state(&self) -> StoreResult<PaginationState> {
        let rows_per_page = validate_rows_per_page(self.default_rows_per_page)?;
        Ok(PaginationState::with_rows_per_page(rows_per_page))
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Settings for the tracing subscriber installed by `telemetry::init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Colored output.
    #[serde(default = "default_true")]
    pub ansi: bool,
}

fn default_log_filter() -> String {
    "info,tally=debug".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
            ansi: true,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub pagination: PaginationSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl TallyConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$TALLY_CONFIG`, or the platform path)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses and validates a TOML document (no environment overrides).
    pub fn from_toml_str(contents: &str) -> StoreResult<Self> {
        let config: TallyConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.store.fetch_timeout_ms == Some(0) {
            return Err(StoreError::InvalidConfig(
                "fetch_timeout_ms must be greater than 0".into(),
            ));
        }

        validate_rows_per_page(self.pagination.default_rows_per_page)?;
        validate_rows_per_page_options(
            &self.pagination.rows_per_page_options,
            self.pagination.default_rows_per_page,
        )?;

        EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            StoreError::InvalidConfig(format!("Invalid log filter '{}': {}", self.logging.filter, e))
        })?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(timeout) = lookup("TALLY_FETCH_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) => {
                    debug!(ms, "Overriding fetch timeout from environment");
                    self.store.fetch_timeout_ms = Some(ms);
                }
                Err(_) => warn!(value = %timeout, "Ignoring invalid TALLY_FETCH_TIMEOUT_MS"),
            }
        }

        if let Some(rows) = lookup("TALLY_ROWS_PER_PAGE") {
            match rows.parse::<usize>() {
                Ok(n) => {
                    debug!(rows = n, "Overriding rows per page from environment");
                    self.pagination.default_rows_per_page = n;
                }
                Err(_) => warn!(value = %rows, "Ignoring invalid TALLY_ROWS_PER_PAGE"),
            }
        }

        if let Some(filter) = lookup("TALLY_LOG_FILTER") {
            self.logging.filter = filter;
        }
    }

    /// Returns the config file path: `$TALLY_CONFIG` or the platform default.
    fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TALLY_CONFIG") {
            return Some(PathBuf::from(path));
        }

        directories::ProjectDirs::from("com", "tally", "app")
            .map(|dirs| dirs.config_dir().join("tally.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = TallyConfig::default();
        assert_eq!(config.store.fetch_timeout(), None);
        assert_eq!(config.pagination.default_rows_per_page, 10);
        assert_eq!(config.pagination.rows_per_page_options, vec![5, 10, 25]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = TallyConfig::from_toml_str(
            r#"
            [store]
            fetch_timeout_ms = 15000

            [pagination]
            default_rows_per_page = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.store.fetch_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.pagination.default_rows_per_page, 25);
        assert_eq!(config.logging, LoggingSettings::default());

        let state = config.pagination.initial_state().unwrap();
        assert_eq!((state.page, state.rows()), (0, 25));
    }

    #[test]
    fn test_config_validation() {
        let mut config = TallyConfig::default();

        config.store.fetch_timeout_ms = Some(0);
        assert!(config.validate().is_err());
        config.store.fetch_timeout_ms = None;

        config.pagination.default_rows_per_page = 50;
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
        config.pagination.default_rows_per_page = 10;

        config.pagination.rows_per_page_options.clear();
        assert!(config.validate().is_err());
        config.pagination.rows_per_page_options = vec![10];

        config.logging.filter = "tally=verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TALLY_FETCH_TIMEOUT_MS", "2500"),
            ("TALLY_ROWS_PER_PAGE", "not-a-number"),
            ("TALLY_LOG_FILTER", "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = TallyConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.store.fetch_timeout_ms, Some(2500));
        assert_eq!(config.pagination.default_rows_per_page, 10);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir()
            .join(format!("tally-config-{}", uuid::Uuid::new_v4()))
            .join("tally.toml");

        let mut config = TallyConfig::default();
        config.store.fetch_timeout_ms = Some(8000);
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[pagination]"));
        assert_eq!(TallyConfig::from_toml_str(&contents).unwrap(), config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let path = std::env::temp_dir().join(format!("tally-bad-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[pagination]\ndefault_rows_per_page = 0\n").unwrap();

        let config = TallyConfig::load_or_default(Some(path.clone()));
        assert_eq!(config.pagination.default_rows_per_page, 10);

        let _ = std::fs::remove_file(path);
    }
}
