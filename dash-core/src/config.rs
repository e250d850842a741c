use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{model::DEFAULT_ICON_BASE_URL, snapshot::SnapshotPolicy};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_JOKE_BASE_URL: &str = "https://v2.jokeapi.dev";
pub const DEFAULT_SNAPSHOT_SIZE: usize = 4;

/// Candidate pool for the random snapshot.
pub const DEFAULT_CITIES: [&str; 20] = [
    "Tokyo",
    "London",
    "New York",
    "Paris",
    "Sydney",
    "Cairo",
    "Rio de Janeiro",
    "Moscow",
    "Mumbai",
    "Beijing",
    "Los Angeles",
    "Cape Town",
    "Buenos Aires",
    "Toronto",
    "Istanbul",
    "Bangkok",
    "Mexico City",
    "Berlin",
    "Singapore",
    "Dubai",
];

/// Weather provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub icon_base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JokeConfig {
    pub base_url: String,
}

impl Default for JokeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_JOKE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub size: usize,
    pub policy: SnapshotPolicy,
    pub cities: Vec<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SNAPSHOT_SIZE,
            policy: SnapshotPolicy::default(),
            cities: DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// api_key = "..."
///
/// [snapshot]
/// size = 4
/// policy = "all-or-nothing"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub jokes: JokeConfig,
    pub snapshot: SnapshotConfig,
}

impl Config {
    /// Resolve the weather API key, preferring the environment over the file.
    pub fn api_key(&self) -> Result<String> {
        pick_api_key(std::env::var(API_KEY_ENV).ok(), self.weather.api_key.as_deref())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.weather.api_key = Some(api_key);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.weather.timeout_secs)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
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
        let dirs = ProjectDirs::from("dev", "weather-dash", "weather-dash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn pick_api_key(from_env: Option<String>, stored: Option<&str>) -> Result<String> {
    let from_env = from_env.filter(|k| !k.trim().is_empty());
    let stored = stored.filter(|k| !k.trim().is_empty()).map(str::to_owned);

    from_env.or(stored).ok_or_else(|| {
        anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `weather-dash configure` or set {API_KEY_ENV}."
        )
    })
}
