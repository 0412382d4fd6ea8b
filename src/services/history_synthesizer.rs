//! Synthesized daily history for a named location.
//!
//! Each day combines a smooth annual cycle, a monsoon reduction for
//! June–September, and bounded random weather noise. The random source and the
//! reference date are supplied by the caller, so a seeded `StdRng` gives a
//! reproducible series.

use chrono::{Datelike, Days, NaiveDate};
use rand::Rng;
use std::f64::consts::PI;

use crate::models::location::{ClimateTable, LocationClimateProfile};
use crate::models::solar::{HistoricalRecord, WeatherCondition};
use crate::services::yield_estimator::round_to;

const BASE_IRRADIANCE_W_M2: f64 = 1000.0;
const MIN_EFFICIENCY: f64 = 60.0;
const MAX_EFFICIENCY: f64 = 95.0;

/// Month indices (0 = January) of the monsoon season.
const MONSOON_MONTHS: std::ops::RangeInclusive<u32> = 5..=8;

pub struct HistorySynthesizer<'a> {
    climate: &'a ClimateTable,
}

impl<'a> HistorySynthesizer<'a> {
    pub fn new(climate: &'a ClimateTable) -> Self {
        Self { climate }
    }

    /// Returns `days` records, oldest first, the last one dated `today`.
    ///
    /// Unknown locations use the fallback profile.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        location: &str,
        days: u32,
        today: NaiveDate,
        rng: &mut R,
    ) -> Vec<HistoricalRecord> {
        let profile = self.climate.resolve(location);
        (0..days)
            .rev()
            .map(|offset| {
                let date = today
                    .checked_sub_days(Days::new(offset as u64))
                    .unwrap_or(NaiveDate::MIN);
                synthesize_day(profile, date, rng)
            })
            .collect()
    }
}

/// One record. Draw order: weather variation, efficiency, irradiance, condition.
fn synthesize_day<R: Rng + ?Sized>(
    profile: &LocationClimateProfile,
    date: NaiveDate,
    rng: &mut R,
) -> HistoricalRecord {
    let seasonal = seasonal_factor(date.ordinal());
    let is_monsoon = is_monsoon_month(date.month0());
    let monsoon_factor = if is_monsoon { 1.0 - profile.monsoon_impact } else { 1.0 };

    let weather_variation = 0.8 + rng.random::<f64>() * 0.4;
    let energy = profile.base_energy_kwh * seasonal * monsoon_factor * weather_variation;

    let efficiency_variation = -5.0 + rng.random::<f64>() * 10.0;
    let efficiency = (profile.efficiency_percent + efficiency_variation).clamp(MIN_EFFICIENCY, MAX_EFFICIENCY);

    let irradiance_variation = 0.7 + rng.random::<f64>() * 0.6;
    let irradiance = BASE_IRRADIANCE_W_M2 * seasonal * monsoon_factor * irradiance_variation;

    let weather_condition = weather_condition(is_monsoon, rng.random::<f64>());

    HistoricalRecord {
        date,
        energy: round_to(energy, 2),
        efficiency: round_to(efficiency, 1),
        solar_irradiance: round_to(irradiance, 0) as i64,
        is_monsoon,
        weather_condition,
    }
}

/// Annual cycle in [0.2, 1.0], peaking near day 171.
pub fn seasonal_factor(day_of_year: u32) -> f64 {
    0.6 + 0.4 * ((day_of_year as f64 - 80.0) * 2.0 * PI / 365.0).sin()
}

pub fn is_monsoon_month(month0: u32) -> bool {
    MONSOON_MONTHS.contains(&month0)
}

/// Maps one uniform draw in [0, 1) onto the season's condition distribution.
pub fn weather_condition(is_monsoon: bool, draw: f64) -> WeatherCondition {
    if is_monsoon {
        if draw < 0.4 {
            WeatherCondition::Rainy
        } else if draw < 0.7 {
            WeatherCondition::Cloudy
        } else {
            WeatherCondition::PartlyCloudy
        }
    } else if draw < 0.6 {
        WeatherCondition::Clear
    } else if draw < 0.8 {
        WeatherCondition::PartlyCloudy
    } else {
        WeatherCondition::Cloudy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_length_order_and_last_date() {
        let table = ClimateTable::maharashtra();
        let synth = HistorySynthesizer::new(&table);
        let today = date(2025, 3, 1);
        let mut rng = StdRng::seed_from_u64(7);

        for days in [1u32, 7, 30, 365] {
            let series = synth.synthesize("Pune", days, today, &mut rng);
            assert_eq!(series.len(), days as usize);
            assert_eq!(series.last().unwrap().date, today);
            assert!(series.windows(2).all(|w| w[1].date == w[0].date.succ_opt().unwrap()));
        }

        // Walks back across a month boundary
        let series = synth.synthesize("Pune", 2, today, &mut rng);
        assert_eq!(series[0].date, date(2025, 2, 28));
    }

    #[test]
    fn test_bounds_and_monsoon_flag() {
        let table = ClimateTable::maharashtra();
        let synth = HistorySynthesizer::new(&table);
        let mut rng = StdRng::seed_from_u64(42);
        let series = synth.synthesize("Kolhapur", 730, date(2024, 12, 31), &mut rng);

        for r in &series {
            assert!((60.0..=95.0).contains(&r.efficiency), "{:?}", r);
            assert!(r.solar_irradiance >= 0);
            assert_eq!(r.is_monsoon, (6..=9).contains(&r.date.month()), "{:?}", r);
            if r.is_monsoon {
                assert_ne!(r.weather_condition, WeatherCondition::Clear);
            } else {
                assert_ne!(r.weather_condition, WeatherCondition::Rainy);
            }
        }
    }

    #[test]
    fn test_energy_stays_within_variation_band() {
        let table = ClimateTable::maharashtra();
        let profile = table.resolve("Nagpur").clone();
        let synth = HistorySynthesizer::new(&table);
        let mut rng = StdRng::seed_from_u64(3);

        for r in synth.synthesize("Nagpur", 365, date(2025, 10, 1), &mut rng) {
            let monsoon = if r.is_monsoon { 1.0 - profile.monsoon_impact } else { 1.0 };
            let centre = profile.base_energy_kwh * seasonal_factor(r.date.ordinal()) * monsoon;
            assert!(r.energy >= centre * 0.8 - 0.005, "{:?}", r);
            assert!(r.energy <= centre * 1.2 + 0.005, "{:?}", r);
            let irr_centre = 1000.0 * seasonal_factor(r.date.ordinal()) * monsoon;
            assert!((r.solar_irradiance as f64) >= (irr_centre * 0.7).floor());
            assert!((r.solar_irradiance as f64) <= (irr_centre * 1.3).ceil());
        }
    }

    #[test]
    fn test_same_seed_same_series() {
        let table = ClimateTable::maharashtra();
        let synth = HistorySynthesizer::new(&table);
        let today = date(2025, 7, 15);
        let a = synth.synthesize("Solapur", 30, today, &mut StdRng::seed_from_u64(11));
        let b = synth.synthesize("Solapur", 30, today, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_location_uses_mumbai_profile() {
        let table = ClimateTable::maharashtra();
        let synth = HistorySynthesizer::new(&table);
        let today = date(2025, 8, 20);
        let unknown = synth.synthesize("Nonexistent City", 5, today, &mut StdRng::seed_from_u64(5));
        let mumbai = synth.synthesize("Mumbai", 5, today, &mut StdRng::seed_from_u64(5));
        assert_eq!(unknown, mumbai);
    }

    #[test]
    fn test_injected_profile_is_used() {
        let mut flat = ClimateTable::maharashtra().resolve("Mumbai").clone();
        flat.base_energy_kwh = 0.0;
        flat.efficiency_percent = 200.0;
        let table = ClimateTable::new(vec![flat]).unwrap();
        let synth = HistorySynthesizer::new(&table);

        let series = synth.synthesize("Mumbai", 10, date(2025, 1, 10), &mut StdRng::seed_from_u64(1));
        assert!(series.iter().all(|r| r.energy == 0.0));
        assert!(series.iter().all(|r| r.efficiency == 95.0));
    }

    #[test]
    fn test_seasonal_factor_shape() {
        assert!((seasonal_factor(80) - 0.6).abs() < 1e-12);
        let peak = (1..=365).map(seasonal_factor).fold(f64::MIN, f64::max);
        let trough = (1..=365).map(seasonal_factor).fold(f64::MAX, f64::min);
        assert!(peak <= 1.0 && peak > 0.999);
        assert!(trough >= 0.2 && trough < 0.201);
    }

    #[test]
    fn test_condition_thresholds() {
        assert_eq!(weather_condition(true, 0.0), WeatherCondition::Rainy);
        assert_eq!(weather_condition(true, 0.39), WeatherCondition::Rainy);
        assert_eq!(weather_condition(true, 0.4), WeatherCondition::Cloudy);
        assert_eq!(weather_condition(true, 0.7), WeatherCondition::PartlyCloudy);
        assert_eq!(weather_condition(false, 0.59), WeatherCondition::Clear);
        assert_eq!(weather_condition(false, 0.6), WeatherCondition::PartlyCloudy);
        assert_eq!(weather_condition(false, 0.8), WeatherCondition::Cloudy);
        assert_eq!(weather_condition(false, 0.999), WeatherCondition::Cloudy);
    }

    #[test]
    fn test_monsoon_months() {
        assert!(!is_monsoon_month(4));
        assert!(is_monsoon_month(5));
        assert!(is_monsoon_month(8));
        assert!(!is_monsoon_month(9));
    }
}
