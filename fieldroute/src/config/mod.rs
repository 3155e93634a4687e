//! User configuration file.
//!
//! The CLI reads `~/.config/fieldroute/config.ini`. Every key is
//! optional; anything missing falls back to the engine defaults, and the
//! API key additionally falls back to the `FIELDROUTE_API_KEY`
//! environment variable.
//!
//! ```ini
//! [provider]
//! api_key = abc123
//! timeout_secs = 10
//!
//! [quota]
//! daily_max = 10
//!
//! [cache]
//! ttl_minutes = 60
//! directory = /home/tech/.local/share/fieldroute
//!
//! [base]
//! lat = 48.1173
//! lon = -1.6778
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::app::{
    EngineConfig, DEFAULT_CACHE_TTL_MINUTES, DEFAULT_DAILY_QUOTA, DEFAULT_PROVIDER_TIMEOUT_SECS,
};
use crate::geo::Coordinate;
use crate::provider::DEFAULT_BASE_URL;

/// Environment variable consulted when the config file has no API key.
pub const API_KEY_ENV: &str = "FIELDROUTE_API_KEY";

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed as INI.
    #[error("cannot read config file: {0}")]
    Read(#[from] ini::Error),

    /// A key holds a value of the wrong type.
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Loaded user configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Directions API key.
    pub api_key: String,
    /// Directions API host.
    pub base_url: String,
    /// Remote request timeout in seconds.
    pub provider_timeout_secs: u64,
    /// Daily remote-call quota.
    pub daily_quota_max: u32,
    /// Cache TTL in minutes.
    pub cache_ttl_minutes: i64,
    /// Directory holding persisted engine state.
    pub state_dir: PathBuf,
    /// Technician base location, when configured.
    pub base: Option<Coordinate>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            daily_quota_max: DEFAULT_DAILY_QUOTA,
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            state_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fieldroute"),
            base: None,
        }
    }
}

impl ConfigFile {
    /// Conventional location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fieldroute").join("config.ini"))
    }

    /// Loads the file at the conventional location; a missing file is
    /// simply the defaults.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads a specific config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path)?;
        let mut config = Self::default();

        if let Some(provider) = ini.section(Some("provider")) {
            if let Some(key) = provider.get("api_key") {
                config.api_key = key.to_string();
            }
            if let Some(url) = provider.get("base_url") {
                config.base_url = url.to_string();
            }
            if let Some(secs) = parse_key(provider.get("timeout_secs"), "provider.timeout_secs")? {
                config.provider_timeout_secs = secs;
            }
        }

        if let Some(quota) = ini.section(Some("quota")) {
            if let Some(max) = parse_key(quota.get("daily_max"), "quota.daily_max")? {
                config.daily_quota_max = max;
            }
        }

        if let Some(cache) = ini.section(Some("cache")) {
            if let Some(ttl) = parse_key(cache.get("ttl_minutes"), "cache.ttl_minutes")? {
                config.cache_ttl_minutes = ttl;
            }
            if let Some(dir) = cache.get("directory") {
                config.state_dir = PathBuf::from(dir);
            }
        }

        if let Some(base) = ini.section(Some("base")) {
            let lat: Option<f64> = parse_key(base.get("lat"), "base.lat")?;
            let lon: Option<f64> = parse_key(base.get("lon"), "base.lon")?;
            if let (Some(lat), Some(lon)) = (lat, lon) {
                config.base = Some(Coordinate::new(lat, lon));
            }
        }

        Ok(config)
    }

    /// Translates user configuration into engine configuration.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_provider_timeout_secs(self.provider_timeout_secs)
            .with_daily_quota(self.daily_quota_max)
            .with_cache_ttl_minutes(self.cache_ttl_minutes)
            .with_storage_path(self.state_dir.join("state.json"))
    }
}

fn parse_key<T: FromStr>(
    value: Option<&str>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match value {
        Some(raw) => raw.parse().map(Some).map_err(|_| ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
        None => Ok(None),
    }
}
