//! Back-office configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use carecms_client::{ClientConfig, ConfigError};
use carecms_core::paging::DEFAULT_PAGE_SIZE;

/// Quiescence window of the debounced search.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

pub const DEFAULT_SESSION_FILE: &str = ".carecms-session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub client: ClientConfig,
    pub search_debounce: Duration,
    /// Page size every list screen starts with.
    pub default_page_size: u32,
    pub session_file: PathBuf,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            default_page_size: DEFAULT_PAGE_SIZE,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `CMS_SEARCH_DEBOUNCE_MS` | `500`                   |
    /// | `CMS_DEFAULT_PAGE_SIZE`  | `10`                    |
    /// | `CMS_SESSION_FILE`       | `.carecms-session.json` |
    ///
    /// plus everything [`ClientConfig::from_env`] reads.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            client: ClientConfig::from_lookup(&lookup)?,
            ..Self::default()
        };

        if let Some(raw) = lookup("CMS_SEARCH_DEBOUNCE_MS") {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::invalid("CMS_SEARCH_DEBOUNCE_MS", &raw, "must be a whole number")
            })?;
            config.search_debounce = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("CMS_DEFAULT_PAGE_SIZE") {
            let size: u32 = raw.trim().parse().map_err(|_| {
                ConfigError::invalid("CMS_DEFAULT_PAGE_SIZE", &raw, "must be a whole number")
            })?;
            if size == 0 {
                return Err(ConfigError::invalid(
                    "CMS_DEFAULT_PAGE_SIZE",
                    &raw,
                    "must be at least 1",
                ));
            }
            config.default_page_size = size;
        }

        if let Some(raw) = lookup("CMS_SESSION_FILE") {
            if raw.trim().is_empty() {
                return Err(ConfigError::invalid("CMS_SESSION_FILE", &raw, "must not be empty"));
            }
            config.session_file = PathBuf::from(raw.trim());
        }

        Ok(config)
    }
}
