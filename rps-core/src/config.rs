use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{account::Credential, error::FetchError, model::Coordinates, provider::ProviderId};

/// Environment variable that overrides the stored OpenWeather key.
pub const WEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_LOCATION_LABEL: &str =
    "Spot Software SRL - Via dell'Arrigoni 260, Cesena (FC)";
pub const DEFAULT_COORDINATES: Coordinates = Coordinates::new(44.1646677902515, 12.219122156784248);

/// Settings for a single provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the provider's public endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// The spot whose weather is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LOCATION_LABEL.to_string(),
            latitude: DEFAULT_COORDINATES.latitude,
            longitude: DEFAULT_COORDINATES.longitude,
        }
    }
}

impl LocationConfig {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Signed-in account, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Credential>,
}

impl Config {
    /// Load config from `path` with environment overrides applied, or
    /// defaults if the file doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::read_from(path)?;

        if let Ok(key) = std::env::var(WEATHER_API_KEY_ENV) {
            cfg.apply_weather_key_override(&key);
        }

        Ok(cfg)
    }

    /// Load only what is stored in the file. Use this before editing and
    /// saving, so environment overrides don't end up on disk.
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "rps", "rps-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    fn provider_config_mut(&mut self, id: ProviderId) -> &mut ProviderConfig {
        self.providers.entry(id.as_str().to_string()).or_default()
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, id: ProviderId, api_key: String) {
        self.provider_config_mut(id).api_key = Some(api_key);
    }

    pub fn set_provider_base_url(&mut self, id: ProviderId, base_url: String) {
        self.provider_config_mut(id).base_url = Some(base_url);
    }

    pub fn provider_base_url(&self, id: ProviderId) -> Option<&str> {
        self.provider_config(id).and_then(|cfg| cfg.base_url.as_deref())
    }

    /// Returns the API key for a provider, ignoring blank values.
    pub fn provider_api_key(&self, id: ProviderId) -> Option<&str> {
        self.provider_config(id)
            .and_then(|cfg| cfg.api_key.as_deref())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn is_provider_configured(&self, id: ProviderId) -> bool {
        !id.requires_api_key() || self.provider_api_key(id).is_some()
    }

    /// Like [`Config::provider_api_key`], but a missing key is an explicit
    /// [`FetchError::NotConfigured`] for callers to branch on.
    pub fn resolve_api_key(&self, id: ProviderId) -> Result<&str, FetchError> {
        self.provider_api_key(id)
            .ok_or_else(|| FetchError::NotConfigured(format!("API key for provider '{id}'")))
    }

    fn apply_weather_key_override(&mut self, key: &str) {
        if key.trim().is_empty() {
            return;
        }
        debug!("using weather API key from {WEATHER_API_KEY_ENV}");
        self.upsert_provider_api_key(ProviderId::OpenWeather, key.trim().to_string());
    }
}
