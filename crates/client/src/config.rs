//! Client configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const TESTING_BASE_URL: &str = "https://samarawellapi.disctesting.in/api/";
const PRODUCTION_BASE_URL: &str = "https://api.samarawell.com/api/";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used.
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Deployment the API base URL defaults to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiEnvironment {
    #[default]
    Testing,
    Production,
}

impl ApiEnvironment {
    pub fn default_base_url(self) -> &'static str {
        match self {
            ApiEnvironment::Testing => TESTING_BASE_URL,
            ApiEnvironment::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl FromStr for ApiEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testing" | "test" => Ok(ApiEnvironment::Testing),
            "production" | "prod" => Ok(ApiEnvironment::Production),
            _ => Err("expected `testing` or `production`".into()),
        }
    }
}

/// Connection settings for [`crate::MasterApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub environment: ApiEnvironment,
    /// Base URL, always ending in `/`. Endpoint paths are appended to it.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(ApiEnvironment::default())
    }
}

impl ClientConfig {
    pub fn for_environment(environment: ApiEnvironment) -> Self {
        Self {
            environment,
            base_url: environment.default_base_url().to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Point the client at an explicit base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(base_url.into());
        self
    }

    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default                     |
    /// |----------------------------|-----------------------------|
    /// | `CMS_API_ENV`              | `testing`                   |
    /// | `CMS_API_BASE_URL`         | base URL of `CMS_API_ENV`   |
    /// | `CMS_REQUEST_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("CMS_API_ENV") {
            Some(raw) => raw
                .parse::<ApiEnvironment>()
                .map_err(|reason| ConfigError::invalid("CMS_API_ENV", &raw, reason))?,
            None => ApiEnvironment::default(),
        };

        let mut config = Self::for_environment(environment);

        if let Some(raw) = lookup("CMS_API_BASE_URL") {
            let trimmed = raw.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError::invalid(
                    "CMS_API_BASE_URL",
                    &raw,
                    "must be an http(s) URL",
                ));
            }
            config = config.with_base_url(trimmed);
        }

        if let Some(raw) = lookup("CMS_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::invalid("CMS_REQUEST_TIMEOUT_SECS", &raw, "must be a whole number")
            })?;
            if secs == 0 {
                return Err(ConfigError::invalid(
                    "CMS_REQUEST_TIMEOUT_SECS",
                    &raw,
                    "must be at least 1",
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn normalize_base_url(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
