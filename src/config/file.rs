//! TOML configuration file loading
//!
//! Supports `~/.config/connect-skill/config.toml` as a persistent config
//! source. All fields are optional; the file is a partial overlay on top of
//! defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConnectConfigFile {
    /// Streaming Web API settings
    #[serde(default)]
    pub api: ApiFileConfig,

    /// Voice platform settings
    #[serde(default)]
    pub skill: SkillFileConfig,

    /// Device discovery settings
    #[serde(default)]
    pub devices: DevicesFileConfig,
}

/// Web API configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiFileConfig {
    /// Base URL (e.g. "https://api.spotify.com/v1")
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillFileConfig {
    /// Application id requests must be addressed to
    pub application_id: Option<String>,
}

/// Device discovery configuration
#[derive(Debug, Default, Deserialize)]
pub struct DevicesFileConfig {
    /// Lifetime of a cached device listing
    pub cache_ttl_secs: Option<u64>,

    /// Maximum users held in the device cache
    pub cache_capacity: Option<u64>,

    /// Minimum similarity for a spoken device name to match
    pub match_threshold: Option<f64>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ConnectConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ConnectConfigFile {
    let Some(path) = config_file_path() else {
        return ConnectConfigFile::default();
    };

    if !path.exists() {
        return ConnectConfigFile::default();
    }

    load_from(&path)
}

/// Load a config file from an explicit path, falling back to defaults
pub fn load_from(path: &Path) -> ConnectConfigFile {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConnectConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConnectConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/connect-skill/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("connect-skill").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file() {
        let fc: ConnectConfigFile = toml::from_str(
            r#"
            [devices]
            match_threshold = 0.9
            "#,
        )
        .unwrap();

        assert_eq!(fc.devices.match_threshold, Some(0.9));
        assert!(fc.devices.cache_ttl_secs.is_none());
        assert!(fc.api.base_url.is_none());
        assert!(fc.skill.application_id.is_none());
    }

    #[test]
    fn test_unreadable_file_falls_back() {
        let path = std::env::temp_dir().join("connect-skill-missing-config.toml");
        let fc = load_from(&path);
        assert!(fc.api.timeout_secs.is_none());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let path = std::env::temp_dir().join(format!(
            "connect-skill-malformed-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let fc = load_from(&path);
        assert!(fc.api.base_url.is_none());

        std::fs::remove_file(&path).unwrap();
    }
}
