//! Environment-driven configuration.
//!
//! - `PRODUCTIVE_API_KEY` - API token (required)
//! - `PRODUCTIVE_ORGANIZATION` - Organization id (required)
//! - `PRODUCTIVE_BASE_URL` - API root (default: `https://api.productive.io/api/v2`)
//! - `PRODUCTIVE_TIMEOUT` - Per-attempt request timeout in seconds (default: 30)
//! - `PRODUCTIVE_ITEMS_PER_PAGE` - Default `page[size]` for list tools (default: 50)

use std::time::Duration;

use thiserror::Error;

/// Default Productive API root.
pub const DEFAULT_BASE_URL: &str = "https://api.productive.io/api/v2";

/// Largest `page[size]` the Productive API accepts.
pub const MAX_PAGE_SIZE: u32 = 200;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ITEMS_PER_PAGE: u32 = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub organization: String,
    pub base_url: String,
    pub timeout: Duration,
    pub items_per_page: u32,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key =
            non_empty("PRODUCTIVE_API_KEY").ok_or(ConfigError::Missing("PRODUCTIVE_API_KEY"))?;
        let organization = non_empty("PRODUCTIVE_ORGANIZATION")
            .ok_or(ConfigError::Missing("PRODUCTIVE_ORGANIZATION"))?;
        let base_url = non_empty("PRODUCTIVE_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match non_empty("PRODUCTIVE_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    name: "PRODUCTIVE_TIMEOUT",
                    expected: "a positive number of seconds",
                    value: raw,
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let items_per_page = match non_empty("PRODUCTIVE_ITEMS_PER_PAGE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .map(clamp_page_size)
                .ok_or(ConfigError::Invalid {
                    name: "PRODUCTIVE_ITEMS_PER_PAGE",
                    expected: "a positive integer",
                    value: raw,
                })?,
            None => DEFAULT_ITEMS_PER_PAGE,
        };

        let config = Self {
            api_key,
            organization,
            base_url,
            timeout,
            items_per_page,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that may have been set directly rather than read from the environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("PRODUCTIVE_API_KEY"));
        }
        if self.organization.trim().is_empty() {
            return Err(ConfigError::Missing("PRODUCTIVE_ORGANIZATION"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "PRODUCTIVE_BASE_URL",
                expected: "an http(s) URL",
                value: self.base_url.clone(),
            });
        }
        Ok(())
    }
}

/// Clamp a requested page size into the range the API accepts.
pub fn clamp_page_size(size: u32) -> u32 {
    size.clamp(1, MAX_PAGE_SIZE)
}
