use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name of the profile every unknown location resolves to.
pub const FALLBACK_LOCATION: &str = "Mumbai";

// ─── Climate profile ─────────────────────────────────────────────────────────

/// Static climate constants for one named location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationClimateProfile {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Equivalent full-sun hours per day
    pub peak_sun_hours: f64,
    /// System efficiency baseline (%), also the centre of the historical efficiency band
    pub efficiency_percent: f64,
    /// Fractional output reduction during the monsoon months [0..1]
    pub monsoon_impact: f64,
    /// Installed cost (₹ per W)
    pub cost_per_watt: f64,
    /// Typical daily energy yield (kWh) before seasonal adjustment
    pub base_energy_kwh: f64,
    /// Annual mean irradiation (kWh/m²/day)
    pub annual_irradiance_kwh_m2: f64,
    pub solar_class: String,
    pub best_season: String,
    pub optimal: OptimalConfig,
}

/// Recommended fixed installation for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OptimalConfig {
    pub tilt_angle: f64,
    pub azimuth: f64,
    pub recommended_capacity: f64,
    pub notes: String,
}

impl OptimalConfig {
    /// Configuration returned for locations without a tailored recommendation.
    pub fn standard() -> Self {
        Self {
            tilt_angle: 30.0,
            azimuth: 180.0,
            recommended_capacity: 5.0,
            notes: "Standard configuration".to_string(),
        }
    }
}

/// Display-oriented summary of a location's solar resource.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolarPotential {
    pub annual_irradiance: String,
    pub peak_sun_hours: String,
    pub monsoon_impact: String,
    pub best_season: String,
    pub solar_class: String,
}

impl From<&LocationClimateProfile> for SolarPotential {
    fn from(p: &LocationClimateProfile) -> Self {
        Self {
            annual_irradiance: format!("{:.1} kWh/m²/day", p.annual_irradiance_kwh_m2),
            peak_sun_hours: format!("{:.1} hours/day", p.peak_sun_hours),
            monsoon_impact: format!("{}% reduction", (p.monsoon_impact * 100.0).round() as i64),
            best_season: p.best_season.clone(),
            solar_class: p.solar_class.clone(),
        }
    }
}

// ─── Climate table ───────────────────────────────────────────────────────────

/// Immutable location → profile mapping shared by every estimator.
///
/// Lookups are case-sensitive exact matches. `resolve` never fails: names that
/// are not in the table get the `FALLBACK_LOCATION` profile.
#[derive(Debug, Clone)]
pub struct ClimateTable {
    /// Insertion order, for stable listings
    order: Vec<String>,
    profiles: HashMap<String, LocationClimateProfile>,
    fallback: LocationClimateProfile,
}

impl ClimateTable {
    /// Builds a table from a list of profiles. Later duplicates replace earlier ones.
    ///
    /// Returns `None` if the list has no `FALLBACK_LOCATION` entry, since `resolve`
    /// could not honour its contract.
    pub fn new(list: Vec<LocationClimateProfile>) -> Option<Self> {
        let mut order = Vec::with_capacity(list.len());
        let mut profiles = HashMap::with_capacity(list.len());
        for p in list {
            if !profiles.contains_key(&p.name) {
                order.push(p.name.clone());
            }
            profiles.insert(p.name.clone(), p);
        }
        let fallback = profiles.get(FALLBACK_LOCATION)?.clone();
        Some(Self { order, profiles, fallback })
    }

    /// Built-in table of Maharashtra cities.
    pub fn maharashtra() -> Self {
        let list = vec![
            city("Mumbai", 19.0760, 72.8777, 5.2, 75.0, 0.35, 50.0, 12.0, 5.8, "Excellent",
                 (25.0, 5.0, "Coastal climate, consider salt resistance")),
            city("Pune", 18.5204, 73.8567, 5.5, 78.0, 0.30, 48.0, 14.0, 6.1, "Excellent",
                 (28.0, 5.0, "Moderate climate, excellent solar potential")),
            city("Nagpur", 21.1458, 79.0882, 5.8, 82.0, 0.25, 45.0, 16.0, 6.3, "Outstanding",
                 (32.0, 6.0, "Hot climate, consider cooling systems")),
            city("Nashik", 19.9975, 73.7898, 5.3, 76.0, 0.32, 49.0, 13.0, 5.9, "Excellent",
                 (30.0, 5.0, "Pleasant climate, good for solar")),
            city("Aurangabad", 19.8762, 75.3433, 5.4, 79.0, 0.28, 47.0, 15.0, 6.0, "Excellent",
                 (29.0, 5.0, "Moderate climate, stable performance")),
            city("Solapur", 17.6599, 75.9064, 5.9, 84.0, 0.22, 44.0, 17.0, 6.4, "Outstanding",
                 (33.0, 6.0, "Hot climate, high solar potential")),
            city("Kolhapur", 16.7050, 74.2433, 5.1, 73.0, 0.38, 51.0, 11.0, 5.7, "Very Good",
                 (26.0, 5.0, "Humid climate, consider ventilation")),
            city("Amravati", 20.9374, 77.7796, 5.6, 80.0, 0.27, 46.0, 15.0, 6.2, "Excellent",
                 (31.0, 5.0, "Moderate climate, good solar potential")),
        ];
        Self::new(list).unwrap_or_else(|| unreachable!("built-in table contains the fallback city"))
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, name: &str) -> Option<&LocationClimateProfile> {
        self.profiles.get(name)
    }

    /// Exact lookup falling back to the default profile.
    pub fn resolve(&self, name: &str) -> &LocationClimateProfile {
        self.profiles.get(name).unwrap_or(&self.fallback)
    }

    /// Location names in table order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationClimateProfile> {
        self.order.iter().filter_map(|n| self.profiles.get(n))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Recommended configuration; unknown names get `OptimalConfig::standard()`.
    pub fn optimal_config(&self, name: &str) -> OptimalConfig {
        self.get(name)
            .map(|p| p.optimal.clone())
            .unwrap_or_else(OptimalConfig::standard)
    }
}

#[allow(clippy::too_many_arguments)]
fn city(
    name: &str,
    latitude: f64,
    longitude: f64,
    peak_sun_hours: f64,
    efficiency_percent: f64,
    monsoon_impact: f64,
    cost_per_watt: f64,
    base_energy_kwh: f64,
    annual_irradiance_kwh_m2: f64,
    solar_class: &str,
    (tilt_angle, recommended_capacity, notes): (f64, f64, &str),
) -> LocationClimateProfile {
    LocationClimateProfile {
        name: name.to_string(),
        latitude,
        longitude,
        peak_sun_hours,
        efficiency_percent,
        monsoon_impact,
        cost_per_watt,
        base_energy_kwh,
        annual_irradiance_kwh_m2,
        solar_class: solar_class.to_string(),
        best_season: "Oct-May".to_string(),
        optimal: OptimalConfig {
            tilt_angle,
            azimuth: 180.0,
            recommended_capacity,
            notes: notes.to_string(),
        },
    }
}
