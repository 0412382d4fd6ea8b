use anyhow::{Context, bail};
use serde::Deserialize;

use crate::models::location::{ClimateTable, FALLBACK_LOCATION, LocationClimateProfile};

/// Environment variable overriding `weather.api_key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    /// Replaces the built-in climate table when present
    #[serde(default)]
    pub locations: Option<Vec<LocationClimateProfile>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_history_days")]
    pub default_days: u32,
    #[serde(default = "default_max_history_days")]
    pub max_days: u32,
}

fn default_port() -> u16 { 5000 }
fn default_weather_url() -> String { "https://api.openweathermap.org/data/2.5".to_string() }
fn default_timeout_s() -> u64 { 10 }
fn default_history_days() -> u32 { 30 }
fn default_max_history_days() -> u32 { 3650 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), cors_origins: Vec::new() }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { base_url: default_weather_url(), api_key: String::new(), timeout_s: default_timeout_s() }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { default_days: default_history_days(), max_days: default_max_history_days() }
    }
}

impl Config {
    /// Reads and validates the JSON config at `path`, then applies environment overrides.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path))?;
        let mut config = Self::from_json(&content)
            .with_context(|| format!("parsing {}", path))?;
        config.apply_env();
        Ok(config)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.weather.api_key = key.trim().to_string();
            }
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.history.default_days == 0 || self.history.default_days > self.history.max_days {
            bail!("history.default_days must be between 1 and history.max_days");
        }
        if let Some(list) = &self.locations {
            if !list.iter().any(|p| p.name == FALLBACK_LOCATION) {
                bail!("locations must include a \"{}\" entry", FALLBACK_LOCATION);
            }
        }
        Ok(())
    }

    /// The configured table, or the built-in one.
    pub fn climate_table(&self) -> ClimateTable {
        self.locations
            .clone()
            .and_then(ClimateTable::new)
            .unwrap_or_else(ClimateTable::maharashtra)
    }
}
