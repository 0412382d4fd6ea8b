use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::location::OptimalConfig;
use crate::models::weather::WeatherObservation;

// ─── Estimator inputs ────────────────────────────────────────────────────────

/// One weather reading, with every field already defaulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSnapshot {
    /// Ambient temperature (°C)
    pub temperature_c: f64,
    /// Relative humidity (%)
    pub humidity_percent: f64,
    /// Cloud cover (%)
    pub cloud_cover_percent: f64,
    /// Wind speed (m/s)
    pub wind_speed_ms: f64,
    /// Base solar irradiance (W/m²)
    pub irradiance_w_m2: f64,
}

impl WeatherSnapshot {
    pub const DEFAULT_TEMPERATURE_C: f64 = 25.0;
    pub const DEFAULT_HUMIDITY_PERCENT: f64 = 60.0;
    pub const DEFAULT_CLOUD_COVER_PERCENT: f64 = 0.0;
    pub const DEFAULT_WIND_SPEED_MS: f64 = 2.0;
    pub const DEFAULT_IRRADIANCE_W_M2: f64 = 500.0;
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self {
            temperature_c: Self::DEFAULT_TEMPERATURE_C,
            humidity_percent: Self::DEFAULT_HUMIDITY_PERCENT,
            cloud_cover_percent: Self::DEFAULT_CLOUD_COVER_PERCENT,
            wind_speed_ms: Self::DEFAULT_WIND_SPEED_MS,
            irradiance_w_m2: Self::DEFAULT_IRRADIANCE_W_M2,
        }
    }
}

/// Drops a zero reading so the field's default applies, same as an absent one.
pub fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Fixed panel installation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfiguration {
    pub capacity_kw: f64,
    /// Module efficiency (%)
    pub efficiency_percent: f64,
    pub tilt_deg: f64,
    pub azimuth_deg: f64,
}

impl PanelConfiguration {
    pub const DEFAULT_TILT_DEG: f64 = 30.0;
    pub const DEFAULT_AZIMUTH_DEG: f64 = 180.0;

    pub fn new(capacity_kw: f64, efficiency_percent: f64, tilt_deg: Option<f64>, azimuth_deg: Option<f64>) -> Self {
        Self {
            capacity_kw,
            efficiency_percent,
            tilt_deg: nonzero(tilt_deg).unwrap_or(Self::DEFAULT_TILT_DEG),
            azimuth_deg: nonzero(azimuth_deg).unwrap_or(Self::DEFAULT_AZIMUTH_DEG),
        }
    }
}

// ─── Estimator output ────────────────────────────────────────────────────────

/// Instantaneous, periodic, and financial forecast for one installation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Current AC power (kW)
    pub current_power: f64,
    /// kWh/day
    pub daily_energy: f64,
    pub monthly_energy: f64,
    pub yearly_energy: f64,
    /// Output relative to 80% of nameplate (%)
    pub efficiency: f64,
    pub peak_sun_hours: f64,
    /// W/m²
    pub effective_irradiance: f64,
    pub financials: Financials,
    pub weather_factors: WeatherFactors,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    /// ₹
    pub total_cost: f64,
    /// ₹/year
    pub yearly_savings: f64,
    /// Years
    pub payback_period: f64,
    /// %/year
    pub roi: f64,
}

/// Individual derating factors. Cloud, tilt and azimuth are integer percentages;
/// temperature and humidity are ratios.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherFactors {
    pub cloud_factor: f64,
    pub temp_factor: f64,
    pub humidity_factor: f64,
    pub tilt_efficiency: f64,
    pub azimuth_efficiency: f64,
}

// ─── Historical series ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WeatherCondition {
    Clear,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Cloudy,
    Rainy,
}

/// One synthesized day.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalRecord {
    pub date: NaiveDate,
    /// kWh
    pub energy: f64,
    /// %, within [60, 95]
    pub efficiency: f64,
    /// W/m²
    pub solar_irradiance: i64,
    pub is_monsoon: bool,
    pub weather_condition: WeatherCondition,
}

// ─── Sizing calculator ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appliance {
    pub name: String,
    /// W per unit
    pub wattage: f64,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Hours of use per day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    /// kWh/day for all units; derived from wattage, hours and quantity when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_consumption: Option<f64>,
}

fn default_quantity() -> f64 { 1.0 }

impl Appliance {
    pub fn daily_consumption_kwh(&self) -> f64 {
        self.daily_consumption
            .unwrap_or_else(|| self.wattage * self.hours.unwrap_or(0.0) * self.quantity / 1000.0)
    }

    /// Connected load for all units (W).
    pub fn load_w(&self) -> f64 {
        self.wattage * self.quantity
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizingRequest {
    pub location: String,
    /// kWh/day; the appliance total is used when absent
    #[serde(default)]
    pub daily_consumption: Option<f64>,
    #[serde(default)]
    pub appliances: Vec<Appliance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceShare {
    pub name: String,
    pub wattage: f64,
    pub quantity: f64,
    pub daily_consumption: f64,
    /// Share of the total connected load (%)
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizingResult {
    pub location: String,
    pub daily_consumption: f64,
    pub monthly_consumption: f64,
    /// Connected load (W)
    pub total_load: f64,
    pub required_capacity: f64,
    pub number_of_panels: u32,
    /// W per panel
    pub panel_capacity: f64,
    pub actual_capacity: f64,
    pub peak_sun_hours: f64,
    /// System efficiency as a ratio
    pub efficiency: f64,
    pub estimated_generation: f64,
    pub cost_estimate: f64,
    pub daily_savings: f64,
    pub payback_period: f64,
    pub appliance_breakdown: Vec<ApplianceShare>,
}

// ─── REST request / response types ───────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub location: String,
    /// Weather to estimate from; fetched live for the location when absent
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub weather_data: Option<WeatherObservation>,
    pub panel_capacity: f64,
    pub panel_efficiency: f64,
    #[serde(default)]
    pub tilt_angle: Option<f64>,
    #[serde(default)]
    pub azimuth: Option<f64>,
}

impl PredictRequest {
    /// Range checks applied before the estimator runs.
    pub fn validate(&self) -> Result<(), String> {
        check_location(&self.location)?;
        check_range("panelCapacity", self.panel_capacity, 0.1, 100.0)?;
        check_range("panelEfficiency", self.panel_efficiency, 5.0, 30.0)?;
        if let Some(tilt) = self.tilt_angle {
            check_range("tiltAngle", tilt, 0.0, 90.0)?;
        }
        if let Some(azimuth) = self.azimuth {
            check_range("azimuth", azimuth, 0.0, 360.0)?;
        }
        Ok(())
    }

    pub fn panel(&self) -> PanelConfiguration {
        PanelConfiguration::new(self.panel_capacity, self.panel_efficiency, self.tilt_angle, self.azimuth)
    }
}

/// Location names must be 2..=50 characters.
pub fn check_location(location: &str) -> Result<(), String> {
    let len = location.chars().count();
    if !(2..=50).contains(&len) {
        return Err(format!("\"location\" length must be between 2 and 50 characters, got {}", len));
    }
    Ok(())
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), String> {
    if !value.is_finite() || value < min || value > max {
        return Err(format!("\"{}\" must be between {} and {}", field, min, max));
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPayload {
    pub location: String,
    pub predictions: PredictionResult,
    pub timestamp: DateTime<Utc>,
    pub algorithm: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPayload {
    pub location: String,
    pub days: u32,
    pub data: Vec<HistoricalRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimalConfigPayload {
    pub location: String,
    pub tilt_angle: f64,
    pub azimuth: f64,
    pub recommended_capacity: f64,
    pub notes: String,
}

impl OptimalConfigPayload {
    pub fn new(location: String, config: OptimalConfig) -> Self {
        Self {
            location,
            tilt_angle: config.tilt_angle,
            azimuth: config.azimuth,
            recommended_capacity: config.recommended_capacity,
            notes: config.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(capacity: f64, efficiency: f64) -> PredictRequest {
        PredictRequest {
            location: "Pune".to_string(),
            weather_data: None,
            panel_capacity: capacity,
            panel_efficiency: efficiency,
            tilt_angle: None,
            azimuth: None,
        }
    }

    #[test]
    fn test_validate_ranges() {
        assert!(request(5.0, 20.0).validate().is_ok());
        assert!(request(0.05, 20.0).validate().is_err());
        assert!(request(5.0, 31.0).validate().is_err());
        assert!(request(f64::NAN, 20.0).validate().is_err());

        let mut r = request(5.0, 20.0);
        r.tilt_angle = Some(91.0);
        assert!(r.validate().is_err());
        r.tilt_angle = Some(0.0);
        r.azimuth = Some(360.0);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_location_length() {
        assert!(check_location("X").is_err());
        assert!(check_location("Pu").is_ok());
        assert!(check_location(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_panel_defaults_apply_per_field() {
        let mut r = request(5.0, 20.0);
        r.azimuth = Some(90.0);
        let panel = r.panel();
        assert_eq!(panel.tilt_deg, 30.0);
        assert_eq!(panel.azimuth_deg, 90.0);
    }

    #[test]
    fn test_zero_orientation_uses_defaults() {
        let mut r = request(5.0, 20.0);
        r.tilt_angle = Some(0.0);
        r.azimuth = Some(0.0);
        let panel = r.panel();
        assert_eq!(panel.tilt_deg, 30.0);
        assert_eq!(panel.azimuth_deg, 180.0);
    }

    #[test]
    fn test_appliance_consumption_derived_from_hours() {
        let fan: Appliance = serde_json::from_str(
            r#"{"name":"Fan","wattage":75,"quantity":2,"hours":8}"#,
        ).unwrap();
        assert!((fan.daily_consumption_kwh() - 1.2).abs() < 1e-12);
        assert_eq!(fan.load_w(), 150.0);

        let tv: Appliance = serde_json::from_str(
            r#"{"name":"TV","wattage":100,"dailyConsumption":0.5}"#,
        ).unwrap();
        assert_eq!(tv.quantity, 1.0);
        assert_eq!(tv.daily_consumption_kwh(), 0.5);
    }

    #[test]
    fn test_weather_condition_labels() {
        let json = serde_json::to_string(&WeatherCondition::PartlyCloudy).unwrap();
        assert_eq!(json, "\"Partly Cloudy\"");
        let json = serde_json::to_string(&WeatherCondition::Rainy).unwrap();
        assert_eq!(json, "\"Rainy\"");
    }
}
