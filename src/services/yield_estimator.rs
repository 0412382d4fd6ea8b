/// ============================================================
///  Weather-factor Solar Yield Estimator
///
///  Pipeline:
///   1. Weather derating  – cloud, temperature, humidity factors
///   2. Effective irradiance on the panel plane
///   3. Orientation       – tilt (with temperature term) and azimuth
///   4. Power             – panel area × irradiance × efficiency
///   5. Energy            – peak-sun-hours scaling to day/month/year
///   6. Financials        – flat ₹/W cost and ₹/kWh tariff
///
///  Pure and deterministic: the same inputs always give the same result.
/// ============================================================

use crate::models::solar::{
    Financials, PanelConfiguration, PredictionResult, WeatherFactors, WeatherSnapshot,
};

// ─── Model constants ─────────────────────────────────────────
const REFERENCE_TEMP_C: f64 = 25.0;
const TEMP_COEFFICIENT: f64 = 0.004; // per °C
const MAX_CLOUD_LOSS: f64 = 0.7;
const MAX_HUMIDITY_LOSS: f64 = 0.1;

const OPTIMAL_TILT_DEG: f64 = 30.0;
const MAX_TILT_LOSS: f64 = 0.3;
const MIN_TILT_EFFICIENCY: f64 = 0.5;
const OPTIMAL_AZIMUTH_DEG: f64 = 180.0;
const MAX_AZIMUTH_LOSS: f64 = 0.2;

const BASE_SUN_HOURS: f64 = 5.5;
const MAX_SUN_HOURS_CLOUD_LOSS: f64 = 0.6;
const TYPICAL_PEAK_RATIO: f64 = 0.8;

const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// ₹ per installed W
pub const COST_PER_WATT: f64 = 50.0;
/// ₹ per kWh
pub const ELECTRICITY_RATE: f64 = 8.0;

/// Unrounded intermediate values, exposed for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldBreakdown {
    pub cloud_factor: f64,
    pub temp_factor: f64,
    pub humidity_factor: f64,
    pub effective_irradiance: f64,
    pub tilt_efficiency: f64,
    pub azimuth_efficiency: f64,
    pub panel_area_m2: f64,
    pub theoretical_power_kw: f64,
    pub actual_power_kw: f64,
    pub peak_sun_hours: f64,
    pub daily_energy_kwh: f64,
    pub monthly_energy_kwh: f64,
    pub yearly_energy_kwh: f64,
    pub efficiency_percent: f64,
    pub total_cost: f64,
    pub yearly_savings: f64,
    pub payback_years: f64,
    pub roi_percent: f64,
}

/// Main entry point: forecast for one weather snapshot and one installation.
pub fn estimate(weather: &WeatherSnapshot, panel: &PanelConfiguration) -> PredictionResult {
    breakdown(weather, panel).into()
}

/// Runs the model and returns every intermediate value, unrounded.
pub fn breakdown(weather: &WeatherSnapshot, panel: &PanelConfiguration) -> YieldBreakdown {
    // ── 1. Weather derating ───────────────────────────────────
    let cloud_factor = cloud_factor(weather.cloud_cover_percent);
    // Temperature coefficient applied to irradiance as in the established model
    let temp_factor = 1.0 + (weather.temperature_c - REFERENCE_TEMP_C) * TEMP_COEFFICIENT;
    let humidity_factor = 1.0 - (weather.humidity_percent / 100.0) * MAX_HUMIDITY_LOSS;

    // ── 2. Effective irradiance ───────────────────────────────
    let effective_irradiance =
        weather.irradiance_w_m2 * cloud_factor * temp_factor * humidity_factor;

    // ── 3. Orientation ────────────────────────────────────────
    let tilt_efficiency = tilt_efficiency(panel.tilt_deg, weather.temperature_c);
    let azimuth_efficiency = azimuth_efficiency(panel.azimuth_deg);

    // ── 4. Power ──────────────────────────────────────────────
    let eff_ratio = panel.efficiency_percent / 100.0;
    let panel_area_m2 = panel.capacity_kw * 1000.0 / eff_ratio / 1000.0;
    let theoretical_power_kw = effective_irradiance * panel_area_m2 * eff_ratio / 1000.0;
    let actual_power_kw = theoretical_power_kw * tilt_efficiency * azimuth_efficiency;

    // ── 5. Energy ─────────────────────────────────────────────
    let peak_sun_hours = peak_sun_hours(weather.cloud_cover_percent);
    let daily_energy_kwh = actual_power_kw * peak_sun_hours;
    let monthly_energy_kwh = daily_energy_kwh * DAYS_PER_MONTH;
    let yearly_energy_kwh = daily_energy_kwh * DAYS_PER_YEAR;

    let efficiency_percent = actual_power_kw / (panel.capacity_kw * TYPICAL_PEAK_RATIO) * 100.0;

    // ── 6. Financials ─────────────────────────────────────────
    let total_cost = panel.capacity_kw * 1000.0 * COST_PER_WATT;
    let yearly_savings = yearly_energy_kwh * ELECTRICITY_RATE;

    YieldBreakdown {
        cloud_factor,
        temp_factor,
        humidity_factor,
        effective_irradiance,
        tilt_efficiency,
        azimuth_efficiency,
        panel_area_m2,
        theoretical_power_kw,
        actual_power_kw,
        peak_sun_hours,
        daily_energy_kwh,
        monthly_energy_kwh,
        yearly_energy_kwh,
        efficiency_percent,
        total_cost,
        yearly_savings,
        payback_years: total_cost / yearly_savings,
        roi_percent: yearly_savings / total_cost * 100.0,
    }
}

/// Linear attenuation, at most 70% at full overcast.
#[inline]
pub fn cloud_factor(cloud_cover_percent: f64) -> f64 {
    1.0 - (cloud_cover_percent / 100.0) * MAX_CLOUD_LOSS
}

/// Tilt loss (up to 30%) times a second temperature term, floored at 50%.
pub fn tilt_efficiency(tilt_deg: f64, temperature_c: f64) -> f64 {
    let tilt_loss = 1.0 - ((tilt_deg - OPTIMAL_TILT_DEG).abs() / 90.0) * MAX_TILT_LOSS;
    let temp_eff = 1.0 - (temperature_c - REFERENCE_TEMP_C) * TEMP_COEFFICIENT;
    (tilt_loss * temp_eff).max(MIN_TILT_EFFICIENCY)
}

/// Up to 20% loss when facing away from south.
pub fn azimuth_efficiency(azimuth_deg: f64) -> f64 {
    1.0 - ((azimuth_deg - OPTIMAL_AZIMUTH_DEG).abs() / 180.0) * MAX_AZIMUTH_LOSS
}

/// 5.5 h base, up to 60% shorter under full cloud.
pub fn peak_sun_hours(cloud_cover_percent: f64) -> f64 {
    BASE_SUN_HOURS * (1.0 - (cloud_cover_percent / 100.0) * MAX_SUN_HOURS_CLOUD_LOSS)
}

/// Rounds half-up (ties toward +∞) to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

impl From<YieldBreakdown> for PredictionResult {
    fn from(b: YieldBreakdown) -> Self {
        PredictionResult {
            current_power: round_to(b.actual_power_kw, 3),
            daily_energy: round_to(b.daily_energy_kwh, 2),
            monthly_energy: round_to(b.monthly_energy_kwh, 0),
            yearly_energy: round_to(b.yearly_energy_kwh, 0),
            efficiency: round_to(b.efficiency_percent, 1),
            peak_sun_hours: round_to(b.peak_sun_hours, 1),
            effective_irradiance: round_to(b.effective_irradiance, 0),
            financials: Financials {
                total_cost: round_to(b.total_cost, 0),
                yearly_savings: round_to(b.yearly_savings, 0),
                payback_period: round_to(b.payback_years, 1),
                roi: round_to(b.roi_percent, 1),
            },
            weather_factors: WeatherFactors {
                cloud_factor: round_to(b.cloud_factor * 100.0, 0),
                temp_factor: round_to(b.temp_factor, 2),
                humidity_factor: round_to(b.humidity_factor, 2),
                tilt_efficiency: round_to(b.tilt_efficiency * 100.0, 0),
                azimuth_efficiency: round_to(b.azimuth_efficiency * 100.0, 0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn reference_weather() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: 25.0,
            humidity_percent: 60.0,
            cloud_cover_percent: 0.0,
            wind_speed_ms: 2.0,
            irradiance_w_m2: 1000.0,
        }
    }

    fn reference_panel() -> PanelConfiguration {
        PanelConfiguration::new(5.0, 20.0, Some(30.0), Some(180.0))
    }

    #[test]
    fn test_reference_scenario_intermediates() {
        let b = breakdown(&reference_weather(), &reference_panel());
        assert!((b.cloud_factor - 1.0).abs() < EPS);
        assert!((b.temp_factor - 1.0).abs() < EPS);
        assert!((b.humidity_factor - 0.94).abs() < EPS);
        assert!((b.effective_irradiance - 940.0).abs() < EPS);
        assert!((b.tilt_efficiency - 1.0).abs() < EPS);
        assert!((b.azimuth_efficiency - 1.0).abs() < EPS);
        assert!((b.panel_area_m2 - 25.0).abs() < EPS);
        assert!((b.theoretical_power_kw - 4.7).abs() < EPS);
        assert!((b.actual_power_kw - 4.7).abs() < EPS);
        assert!((b.peak_sun_hours - 5.5).abs() < EPS);
        assert!((b.daily_energy_kwh - 25.85).abs() < EPS);
    }

    #[test]
    fn test_reference_scenario_rounded() {
        let r = estimate(&reference_weather(), &reference_panel());
        assert_eq!(r.current_power, 4.7);
        assert_eq!(r.daily_energy, 25.85);
        assert_eq!(r.monthly_energy, 776.0);
        assert_eq!(r.yearly_energy, 9435.0);
        assert!((r.efficiency - 117.5).abs() < 1e-6);
        assert_eq!(r.peak_sun_hours, 5.5);
        assert_eq!(r.effective_irradiance, 940.0);

        assert_eq!(r.weather_factors.cloud_factor, 100.0);
        assert_eq!(r.weather_factors.temp_factor, 1.0);
        assert_eq!(r.weather_factors.humidity_factor, 0.94);
        assert_eq!(r.weather_factors.tilt_efficiency, 100.0);
        assert_eq!(r.weather_factors.azimuth_efficiency, 100.0);
    }

    #[test]
    fn test_reference_scenario_payback() {
        let r = estimate(&reference_weather(), &reference_panel());
        assert_eq!(r.financials.total_cost, 250_000.0);
        assert_eq!(r.financials.yearly_savings, 75_482.0);
        assert_eq!(r.financials.payback_period, 3.3);
        assert_eq!(r.financials.roi, 30.2);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let weather = WeatherSnapshot {
            temperature_c: 33.3,
            humidity_percent: 71.0,
            cloud_cover_percent: 42.0,
            wind_speed_ms: 4.1,
            irradiance_w_m2: 812.0,
        };
        let panel = PanelConfiguration::new(3.2, 18.5, Some(12.0), Some(145.0));
        let a = estimate(&weather, &panel);
        let b = estimate(&weather, &panel);
        assert_eq!(a, b);
        assert_eq!(a.current_power.to_bits(), b.current_power.to_bits());
    }

    #[test]
    fn test_more_cloud_means_less_irradiance_and_sun_hours() {
        let panel = reference_panel();
        let mut previous: Option<YieldBreakdown> = None;
        for cc in (0..=100).step_by(10) {
            let weather = WeatherSnapshot { cloud_cover_percent: cc as f64, ..reference_weather() };
            let b = breakdown(&weather, &panel);
            if let Some(prev) = previous {
                assert!(b.effective_irradiance < prev.effective_irradiance, "cloud cover {}", cc);
                assert!(b.peak_sun_hours < prev.peak_sun_hours, "cloud cover {}", cc);
            }
            previous = Some(b);
        }
        let overcast = breakdown(
            &WeatherSnapshot { cloud_cover_percent: 100.0, ..reference_weather() },
            &panel,
        );
        assert!((overcast.cloud_factor - 0.3).abs() < EPS);
        assert!((overcast.peak_sun_hours - 2.2).abs() < EPS);
    }

    #[test]
    fn test_tilt_efficiency_floor() {
        // Extreme heat and a flat panel would go below 50% without the floor
        assert_eq!(tilt_efficiency(90.0, 150.0), 0.5);
        assert!((tilt_efficiency(0.0, 25.0) - 0.9).abs() < EPS);
        assert!((tilt_efficiency(30.0, 35.0) - 0.96).abs() < EPS);
    }

    #[test]
    fn test_azimuth_efficiency_bounds() {
        assert!((azimuth_efficiency(180.0) - 1.0).abs() < EPS);
        assert!((azimuth_efficiency(0.0) - 0.8).abs() < EPS);
        assert!((azimuth_efficiency(360.0) - 0.8).abs() < EPS);
        assert!((azimuth_efficiency(90.0) - 0.9).abs() < EPS);
    }

    #[test]
    fn test_hot_day_derates_tilt_but_boosts_irradiance() {
        let hot = WeatherSnapshot { temperature_c: 35.0, ..reference_weather() };
        let b = breakdown(&hot, &reference_panel());
        assert!((b.temp_factor - 1.04).abs() < EPS);
        assert!((b.tilt_efficiency - 0.96).abs() < EPS);
        assert!((b.actual_power_kw - 4.7 * 1.04 * 0.96).abs() < EPS);
    }

    #[test]
    fn test_default_snapshot_values() {
        let r = estimate(&WeatherSnapshot::default(), &reference_panel());
        // 500 W/m² × 0.94 humidity
        assert_eq!(r.effective_irradiance, 470.0);
        assert_eq!(r.current_power, 2.35);
    }

    #[test]
    fn test_round_to_half_up() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(3.3123, 1), 3.3);
    }
}
