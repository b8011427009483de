//! Configuration management for the connect skill

pub mod file;

use crate::devices::DEFAULT_MATCH_THRESHOLD;
use crate::player::DEFAULT_API_BASE_URL;
use crate::{Error, Result};

use self::file::ConnectConfigFile;

/// Default lifetime of a cached device listing, one hour
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Connect skill configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Streaming Web API client configuration
    pub api: ApiConfig,

    /// Voice platform configuration
    pub skill: SkillConfig,

    /// Device discovery configuration
    pub devices: DeviceConfig,
}

/// Web API client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the Web API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Voice platform configuration
#[derive(Debug, Clone, Default)]
pub struct SkillConfig {
    /// When set, requests addressed to other applications are rejected
    pub application_id: Option<String>,
}

/// Device discovery configuration
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,

    /// Minimum Jaro-Winkler similarity for a name match, 0.0 to 1.0
    pub match_threshold: f64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_capacity: 10_000,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from the environment and the optional config file
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration is invalid
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed file and an environment lookup
    ///
    /// Precedence is env > toml > default. Unparseable numeric env values are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration is invalid
    pub fn from_sources<F>(fc: ConnectConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // API client config (env > toml > default)
        let api = ApiConfig {
            base_url: env("CONNECT_API_BASE_URL")
                .or(fc.api.base_url)
                .unwrap_or(defaults.api.base_url),
            timeout_secs: env("CONNECT_API_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .or(fc.api.timeout_secs)
                .unwrap_or(defaults.api.timeout_secs),
        };

        let skill = SkillConfig {
            application_id: env("CONNECT_APPLICATION_ID")
                .or(fc.skill.application_id)
                .filter(|id| !id.is_empty()),
        };

        // Device discovery config (env > toml > default)
        let devices = DeviceConfig {
            cache_ttl_secs: env("CONNECT_DEVICE_CACHE_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .or(fc.devices.cache_ttl_secs)
                .unwrap_or(defaults.devices.cache_ttl_secs),
            cache_capacity: env("CONNECT_DEVICE_CACHE_CAPACITY")
                .and_then(|s| s.parse().ok())
                .or(fc.devices.cache_capacity)
                .unwrap_or(defaults.devices.cache_capacity),
            match_threshold: env("CONNECT_MATCH_THRESHOLD")
                .and_then(|s| s.parse().ok())
                .or(fc.devices.match_threshold)
                .unwrap_or(defaults.devices.match_threshold),
        };

        let config = Self {
            api,
            skill,
            devices,
        };
        config.validate()?;

        tracing::debug!(
            base_url = %config.api.base_url,
            cache_ttl_secs = config.devices.cache_ttl_secs,
            match_threshold = config.devices.match_threshold,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Check values that would otherwise fail later at request time
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| Error::Config(format!("invalid api base url '{}': {e}", self.api.base_url)))?;

        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api timeout must be at least 1 second".to_string()));
        }

        if self.devices.cache_ttl_secs == 0 {
            return Err(Error::Config(
                "device cache ttl must be at least 1 second".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.devices.match_threshold) {
            return Err(Error::Config(format!(
                "match threshold must be between 0 and 1, got {}",
                self.devices.match_threshold
            )));
        }

        Ok(())
    }
}
