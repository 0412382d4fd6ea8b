use std::fmt;

use crate::models::location::ClimateTable;
use crate::models::solar::{ApplianceShare, SizingRequest, SizingResult};
use crate::services::yield_estimator::ELECTRICITY_RATE;

/// Rated output of one module (W)
pub const PANEL_WATTAGE: f64 = 400.0;

/// Largest daily demand accepted (kWh/day)
pub const MAX_DAILY_CONSUMPTION_KWH: f64 = 100_000.0;

/// Daily demand of a request: the explicit figure, else the appliance total.
pub fn daily_demand_kwh(request: &SizingRequest) -> f64 {
    request
        .daily_consumption
        .unwrap_or_else(|| request.appliances.iter().map(|a| a.daily_consumption_kwh()).sum())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemandError {
    /// Zero, negative, or not a number
    NotPositive,
    TooLarge,
}

impl fmt::Display for DemandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandError::NotPositive => write!(f, "daily consumption must be positive"),
            DemandError::TooLarge => {
                write!(f, "daily consumption must not exceed {} kWh", MAX_DAILY_CONSUMPTION_KWH)
            }
        }
    }
}

/// Demand of a request, rejected unless positive and at most `MAX_DAILY_CONSUMPTION_KWH`.
pub fn checked_demand_kwh(request: &SizingRequest) -> Result<f64, DemandError> {
    let demand = daily_demand_kwh(request);
    if !demand.is_finite() || demand <= 0.0 {
        return Err(DemandError::NotPositive);
    }
    if demand > MAX_DAILY_CONSUMPTION_KWH {
        return Err(DemandError::TooLarge);
    }
    Ok(demand)
}

/// Sizes an installation that covers the request's daily demand at its location.
///
/// Unknown locations use the fallback climate profile. Callers check demand
/// with `checked_demand_kwh` first, which keeps the panel count within `u32`.
pub fn size_system(climate: &ClimateTable, request: &SizingRequest) -> SizingResult {
    let profile = climate.resolve(&request.location);
    let daily = daily_demand_kwh(request);
    let efficiency = profile.efficiency_percent / 100.0;

    let required_capacity = daily / (profile.peak_sun_hours * efficiency);
    let number_of_panels = (required_capacity * 1000.0 / PANEL_WATTAGE).ceil().max(0.0) as u32;
    let actual_capacity = number_of_panels as f64 * PANEL_WATTAGE / 1000.0;

    let cost_estimate = number_of_panels as f64 * PANEL_WATTAGE * profile.cost_per_watt;
    let daily_savings = daily * ELECTRICITY_RATE;
    let payback_period = cost_estimate / (daily_savings * 365.0);

    let total_load: f64 = request.appliances.iter().map(|a| a.load_w()).sum();
    let appliance_breakdown = request
        .appliances
        .iter()
        .map(|a| ApplianceShare {
            name: a.name.clone(),
            wattage: a.wattage,
            quantity: a.quantity,
            daily_consumption: a.daily_consumption_kwh(),
            percentage: if total_load > 0.0 { a.load_w() / total_load * 100.0 } else { 0.0 },
        })
        .collect();

    SizingResult {
        location: request.location.clone(),
        daily_consumption: daily,
        monthly_consumption: daily * 30.0,
        total_load,
        required_capacity,
        number_of_panels,
        panel_capacity: PANEL_WATTAGE,
        actual_capacity,
        peak_sun_hours: profile.peak_sun_hours,
        efficiency,
        estimated_generation: actual_capacity * profile.peak_sun_hours * efficiency,
        cost_estimate,
        daily_savings,
        payback_period,
        appliance_breakdown,
    }
}
