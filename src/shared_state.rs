use std::sync::Arc;

use crate::config::Config;
use crate::models::location::ClimateTable;
use crate::services::weather_service::{WeatherClient, WeatherError};

/// Everything a handler needs. Read-only after startup, so no locks.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Climate profiles shared by the estimators
    pub climate: Arc<ClimateTable>,
    pub weather: WeatherClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, WeatherError> {
        let climate = config.climate_table();
        let weather = WeatherClient::new(&config.weather)?;
        Ok(Self {
            config: Arc::new(config),
            climate: Arc::new(climate),
            weather,
        })
    }
}
