use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::models::solar::{nonzero, WeatherSnapshot};

// ─── OpenWeatherMap wire types ───────────────────────────────────────────────
//
// Only the fields the estimator reads are typed; everything else the provider
// sends is kept in `rest` and echoed back unchanged.

/// A current-weather reading or one forecast list item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MainBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clouds: Option<CloudsBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<WindBlock>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weather: Vec<ConditionBlock>,
    /// W/m²; absent in raw provider data, filled in by this service
    #[serde(rename = "solarIrradiance", default, skip_serializing_if = "Option::is_none")]
    pub solar_irradiance: Option<f64>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudsBlock {
    /// Cloud cover (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionBlock {
    /// Condition group, e.g. "Rain", "Clouds", "Clear"
    #[serde(default)]
    pub main: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl WeatherObservation {
    pub fn cloud_cover(&self) -> Option<f64> {
        self.clouds.as_ref().and_then(|c| c.all)
    }

    /// Condition group of the first reported condition.
    pub fn condition(&self) -> Option<&str> {
        self.weather.first().map(|w| w.main.as_str())
    }

    /// Converts to estimator input, defaulting each field on its own.
    ///
    /// Zero temperature, humidity, wind speed or irradiance counts as missing.
    /// Zero cloud cover is kept, which is also its default.
    pub fn snapshot(&self) -> WeatherSnapshot {
        let main = self.main.as_ref();
        WeatherSnapshot {
            temperature_c: nonzero(main.and_then(|m| m.temp))
                .unwrap_or(WeatherSnapshot::DEFAULT_TEMPERATURE_C),
            humidity_percent: nonzero(main.and_then(|m| m.humidity))
                .unwrap_or(WeatherSnapshot::DEFAULT_HUMIDITY_PERCENT),
            cloud_cover_percent: self.cloud_cover().unwrap_or(WeatherSnapshot::DEFAULT_CLOUD_COVER_PERCENT),
            wind_speed_ms: nonzero(self.wind.as_ref().and_then(|w| w.speed))
                .unwrap_or(WeatherSnapshot::DEFAULT_WIND_SPEED_MS),
            irradiance_w_m2: nonzero(self.solar_irradiance)
                .unwrap_or(WeatherSnapshot::DEFAULT_IRRADIANCE_W_M2),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<WeatherObservation>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

// ─── REST response types ─────────────────────────────────────────────────────

/// Provider reading plus the derived solar fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedWeather {
    #[serde(flatten)]
    pub observation: WeatherObservation,
    pub is_maharashtra_city: bool,
    pub monsoon_season: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolarPotentialEstimate {
    /// W/m²
    pub irradiance: f64,
    /// kWh/m²/day
    pub daily_energy: f64,
    /// Irradiance relative to 1000 W/m² (%)
    pub efficiency: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    #[serde(flatten)]
    pub observation: WeatherObservation,
    pub solar_potential: SolarPotentialEstimate,
}

#[derive(Debug, Serialize)]
pub struct EnhancedForecast {
    pub list: Vec<ForecastEntry>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults_each_field() {
        let obs: WeatherObservation = serde_json::from_str(
            r#"{"main":{"temp":31.5},"clouds":{"all":40}}"#,
        ).unwrap();
        let s = obs.snapshot();
        assert_eq!(s.temperature_c, 31.5);
        assert_eq!(s.humidity_percent, 60.0);
        assert_eq!(s.cloud_cover_percent, 40.0);
        assert_eq!(s.wind_speed_ms, 2.0);
        assert_eq!(s.irradiance_w_m2, 500.0);
    }

    #[test]
    fn test_zero_readings_fall_back_to_defaults() {
        let obs: WeatherObservation = serde_json::from_str(
            r#"{"main":{"temp":0,"humidity":0},"clouds":{"all":0},"wind":{"speed":0},"solarIrradiance":0}"#,
        ).unwrap();
        assert_eq!(obs.snapshot(), WeatherSnapshot::default());
    }

    #[test]
    fn test_negative_temperature_is_kept() {
        let obs: WeatherObservation = serde_json::from_str(r#"{"main":{"temp":-4.5}}"#).unwrap();
        assert_eq!(obs.snapshot().temperature_c, -4.5);
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let raw = r#"{"name":"Pune","main":{"temp":28.0,"pressure":1009},"weather":[{"main":"Clouds","id":803}]}"#;
        let obs: WeatherObservation = serde_json::from_str(raw).unwrap();
        assert_eq!(obs.condition(), Some("Clouds"));

        let back = serde_json::to_value(&obs).unwrap();
        assert_eq!(back["name"], "Pune");
        assert_eq!(back["main"]["pressure"], 1009);
        assert_eq!(back["weather"][0]["id"], 803);
    }
}
