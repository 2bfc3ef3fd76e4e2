//! Sync configuration
//!
//! Defaults target the public JSONPlaceholder posts endpoint. Every value
//! can be overridden from the environment or through the builder methods.

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Default remote endpoint
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
/// Remote records fetched per cycle
pub const DEFAULT_BATCH_SIZE: usize = 12;
/// Interval between periodic cycles
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const ENDPOINT_ENV: &str = "QUOTESYNC_ENDPOINT";
const BATCH_SIZE_ENV: &str = "QUOTESYNC_BATCH_SIZE";
const SYNC_INTERVAL_ENV: &str = "QUOTESYNC_SYNC_INTERVAL_SECS";

/// Configuration for sync cycles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Remote collection URL
    pub endpoint: String,
    /// Maximum remote records fetched per cycle
    pub batch_size: usize,
    /// Periodic sync interval
    pub sync_interval: Duration,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            sync_interval: DEFAULT_SYNC_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl SyncConfig {
    /// Build a configuration from `QUOTESYNC_*` environment variables.
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(endpoint) = normalize_text_option(lookup(ENDPOINT_ENV)) {
            config.endpoint = endpoint;
        }

        if let Some(raw) = normalize_text_option(lookup(BATCH_SIZE_ENV)) {
            config.batch_size = raw.parse().map_err(|_| {
                Error::InvalidInput(format!("{BATCH_SIZE_ENV} must be a positive integer"))
            })?;
        }

        if let Some(raw) = normalize_text_option(lookup(SYNC_INTERVAL_ENV)) {
            let seconds: u64 = raw.parse().map_err(|_| {
                Error::InvalidInput(format!("{SYNC_INTERVAL_ENV} must be a number of seconds"))
            })?;
            config.sync_interval = Duration::from_secs(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the remote endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the number of remote records fetched per cycle
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the periodic sync interval
    #[must_use]
    pub const fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Reject values no sync cycle can run with
    pub fn validate(&self) -> Result<()> {
        if !is_http_url(self.endpoint.trim()) {
            return Err(Error::InvalidInput(
                "sync endpoint must include http:// or https://".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidInput(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.sync_interval.is_zero() {
            return Err(Error::InvalidInput(
                "sync interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
