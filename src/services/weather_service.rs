use std::fmt;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::WeatherConfig;
use crate::models::weather::{ForecastResponse, SolarPotentialEstimate, WeatherObservation};
use crate::services::history_synthesizer::is_monsoon_month;
use crate::services::yield_estimator::{cloud_factor, round_to};

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum WeatherError {
    /// No API key configured
    NotConfigured,
    /// Provider answered 404
    NotFound,
    /// Any other non-success status
    Status(StatusCode),
    Http(reqwest::Error),
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::NotConfigured => write!(f, "WeatherError: no API key configured"),
            WeatherError::NotFound => write!(f, "WeatherError: location not found"),
            WeatherError::Status(s) => write!(f, "WeatherError: provider returned {}", s),
            WeatherError::Http(e) => write!(f, "WeatherError: {}", e),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self { WeatherError::Http(e) }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// OpenWeatherMap client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(cfg: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_s))
            .build()?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Current conditions at a coordinate, metric units.
    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherObservation, WeatherError> {
        self.get("weather", lat, lon).await
    }

    /// 5-day / 3-hour forecast at a coordinate, metric units.
    pub async fn forecast(&self, lat: f64, lon: f64) -> Result<ForecastResponse, WeatherError> {
        self.get("forecast", lat, lon).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str, lat: f64, lon: f64) -> Result<T, WeatherError> {
        if !self.is_configured() {
            return Err(WeatherError::NotConfigured);
        }

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, lat, lon, "requesting weather");

        let resp = self.client.get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::NotFound);
        }
        if !status.is_success() {
            warn!(%status, endpoint, "weather provider returned an error");
            return Err(WeatherError::Status(status));
        }

        Ok(resp.json::<T>().await?)
    }
}

// ─── Derived solar fields ────────────────────────────────────────────────────

const CLEAR_SKY_IRRADIANCE_W_M2: f64 = 1000.0;
const FORECAST_SUN_HOURS: f64 = 6.0;

/// Rough irradiance (W/m²) from cloud cover and the reported condition group.
pub fn irradiance_from_conditions(obs: &WeatherObservation) -> f64 {
    let cloud = cloud_factor(obs.cloud_cover().unwrap_or(0.0));

    let condition = obs.condition().map(str::to_lowercase).unwrap_or_default();
    let condition_factor = if condition.contains("rain") || condition.contains("snow") {
        0.3
    } else if condition.contains("clouds") {
        0.6
    } else {
        1.0
    };

    round_to(CLEAR_SKY_IRRADIANCE_W_M2 * cloud * condition_factor, 0)
}

/// Daily potential of one forecast slot, assuming six full-sun hours.
pub fn solar_potential(obs: &WeatherObservation) -> SolarPotentialEstimate {
    let irradiance = irradiance_from_conditions(obs);
    SolarPotentialEstimate {
        irradiance,
        daily_energy: round_to(irradiance * FORECAST_SUN_HOURS / 1000.0, 2),
        efficiency: (irradiance / CLEAR_SKY_IRRADIANCE_W_M2 * 100.0).clamp(0.0, 100.0),
    }
}

pub fn is_monsoon_season(date: NaiveDate) -> bool {
    is_monsoon_month(date.month0())
}

// Approximate bounding box of Maharashtra
const BOUNDS_NORTH: f64 = 22.0;
const BOUNDS_SOUTH: f64 = 15.5;
const BOUNDS_EAST: f64 = 80.5;
const BOUNDS_WEST: f64 = 72.5;

pub fn in_maharashtra(lat: f64, lon: f64) -> bool {
    (BOUNDS_SOUTH..=BOUNDS_NORTH).contains(&lat) && (BOUNDS_WEST..=BOUNDS_EAST).contains(&lon)
}
