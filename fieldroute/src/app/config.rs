//! Engine configuration.
//!
//! Combines provider, quota, cache and storage settings into the single
//! configuration passed to `RouteEngine::start()`. Defaults match the
//! production constants; tests override through the `with_*` setters.

use std::path::PathBuf;

use crate::provider::DEFAULT_BASE_URL;

/// Maximum remote directions calls per calendar day.
pub const DEFAULT_DAILY_QUOTA: u32 = crate::quota::DEFAULT_DAILY_MAX;

/// Cached traffic results stay valid for one hour.
pub const DEFAULT_CACHE_TTL_MINUTES: i64 = crate::resolver::DEFAULT_CACHE_TTL_MINUTES;

/// Cache-key coordinate rounding (four decimals, ~11 m).
pub const DEFAULT_KEY_PRECISION: usize = crate::cache::DEFAULT_KEY_PRECISION;

/// Remote provider request timeout.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = crate::provider::DEFAULT_TIMEOUT_SECS;

/// Top-level configuration for the route-distance engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Directions API key.
    pub api_key: String,

    /// Directions API host.
    pub base_url: String,

    /// Remote request timeout in seconds.
    pub provider_timeout_secs: u64,

    /// Daily remote-call quota.
    pub daily_quota_max: u32,

    /// Cache entry time-to-live in minutes.
    pub cache_ttl_minutes: i64,

    /// Coordinate decimals for cache keys.
    pub key_precision: usize,

    /// Backing file for cache and quota state. `None` keeps state
    /// in memory only (lost on exit).
    pub storage_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Creates a configuration with production defaults for the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            daily_quota_max: DEFAULT_DAILY_QUOTA,
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            key_precision: DEFAULT_KEY_PRECISION,
            storage_path: None,
        }
    }

    /// Sets the directions API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the provider request timeout.
    pub fn with_provider_timeout_secs(mut self, secs: u64) -> Self {
        self.provider_timeout_secs = secs;
        self
    }

    /// Sets the daily quota.
    pub fn with_daily_quota(mut self, max: u32) -> Self {
        self.daily_quota_max = max;
        self
    }

    /// Sets the cache TTL in minutes.
    pub fn with_cache_ttl_minutes(mut self, minutes: i64) -> Self {
        self.cache_ttl_minutes = minutes;
        self
    }

    /// Sets the backing storage file.
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }
}
