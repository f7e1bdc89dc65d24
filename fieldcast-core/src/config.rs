use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::model::{Coordinates, FALLBACK_COORDINATES};

/// Environment variable that overrides the stored OpenWeather API key.
pub const API_KEY_ENV: &str = "FIELDCAST_API_KEY";

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";

/// OpenWeather credentials and connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenWeatherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for the API root, mostly useful against a local mock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// How the dashboard finds its location when none is given explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,

    /// Try IP-based geolocation before falling back.
    pub detect: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation_url: Option<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            fallback_latitude: FALLBACK_COORDINATES.latitude,
            fallback_longitude: FALLBACK_COORDINATES.longitude,
            detect: true,
            geolocation_url: None,
        }
    }
}

/// Local crop-prediction and market-price service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub base_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [openweather]
/// api_key = "..."
///
/// [location]
/// fallback_latitude = 28.6139
/// fallback_longitude = 77.209
/// detect = true
///
/// [services]
/// base_url = "http://127.0.0.1:8000"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub openweather: OpenWeatherConfig,

    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub services: ServicesConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.fallback_coordinates()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "fieldcast", "fieldcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `FIELDCAST_API_KEY` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.openweather.api_key = Some(key.trim().to_string());
            }
        }
        self
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// Returns the OpenWeather API key, if present.
    pub fn api_key(&self) -> Option<String> {
        self.openweather
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }

    pub fn fallback_coordinates(&self) -> Result<Coordinates> {
        Coordinates::new(
            self.location.fallback_latitude,
            self.location.fallback_longitude,
        )
        .context("Invalid fallback location in config")
    }

    pub fn set_fallback_coordinates(&mut self, coords: Coordinates) {
        self.location.fallback_latitude = coords.latitude;
        self.location.fallback_longitude = coords.longitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_falls_back_to_new_delhi() {
        let cfg = Config::default();

        assert_eq!(cfg.fallback_coordinates().unwrap(), FALLBACK_COORDINATES);
        assert!(cfg.location.detect);
        assert_eq!(cfg.services.base_url, DEFAULT_SERVICE_URL);
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();

        cfg.set_api_key("   ".into());
        assert!(cfg.api_key().is_none());

        cfg.set_api_key(" OPEN_KEY ".into());
        assert_eq!(cfg.api_key().as_deref(), Some("OPEN_KEY"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg = Config::from_toml(
            r#"
            [openweather]
            api_key = "abc"
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(cfg.api_key().as_deref(), Some("abc"));
        assert_eq!(cfg.fallback_coordinates().unwrap(), FALLBACK_COORDINATES);
    }

    #[test]
    fn out_of_range_fallback_is_rejected() {
        let err = Config::from_toml(
            r#"
            [location]
            fallback_latitude = 120.0
            fallback_longitude = 10.0
            detect = false
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Invalid fallback location"));
    }

    #[test]
    fn toml_roundtrip_keeps_settings() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_fallback_coordinates(Coordinates::new(19.076, 72.8777).unwrap());
        cfg.location.detect = false;

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(back.api_key().as_deref(), Some("KEY"));
        assert_eq!(back.fallback_coordinates().unwrap().latitude, 19.076);
        assert!(!back.location.detect);
    }
}
