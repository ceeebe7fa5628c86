use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    location::DEFAULT_IP_ENDPOINT,
    model::{Coordinates, PositionOptions},
    weather::openweather::{DEFAULT_ENDPOINT, DEFAULT_ICON_BASE_URL},
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// How the device position is obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub max_cached_age_ms: u64,

    /// Fixed position; when both are set no lookup is performed.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub ip_endpoint: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        let opts = PositionOptions::default();
        Self {
            high_accuracy: opts.high_accuracy,
            timeout_ms: opts.timeout.as_millis() as u64,
            max_cached_age_ms: opts.max_cached_age.as_millis() as u64,
            latitude: None,
            longitude: None,
            ip_endpoint: DEFAULT_IP_ENDPOINT.to_string(),
        }
    }
}

impl LocationConfig {
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            max_cached_age: Duration::from_millis(self.max_cached_age_ms),
        }
    }

    pub fn fixed_coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    /// Ask before reading the location. `false` behaves like a platform that
    /// grants location access out of band.
    pub explicit: bool,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self { explicit: true }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [location]
/// timeout_ms = 15000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub icon_base_url: String,
    pub location: LocationConfig,
    pub permission: PermissionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            location: LocationConfig::default(),
            permission: PermissionConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
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
        let dirs = ProjectDirs::from("dev", "geoweather", "geoweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the config file.
    pub fn api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        self.resolve_api_key(from_env)
    }

    fn resolve_api_key(&self, from_env: Option<String>) -> Result<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `geoweather configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn set_fixed_location(&mut self, coords: Option<Coordinates>) {
        self.location.latitude = coords.map(|c| c.latitude);
        self.location.longitude = coords.map(|c| c.longitude);
    }
}
