use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::{Local, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{ApiError, ApiResponse};
use crate::models::location::SolarPotential;
use crate::models::solar::{
    HistoricalPayload, OptimalConfigPayload, PredictRequest, PredictionPayload, SizingRequest, SizingResult,
};
use crate::models::weather::WeatherObservation;
use crate::services::history_synthesizer::HistorySynthesizer;
use crate::services::weather_service::irradiance_from_conditions;
use crate::services::sizing_calculator::DemandError;
use crate::services::{sizing_calculator, yield_estimator};
use crate::shared_state::AppState;

pub const ALGORITHM: &str = "Weather-Factor Solar Prediction v1.0";

/// POST /api/solar/predict
/// Forecast power, energy and payback for a panel installation
///
/// Uses `weatherData` when supplied, otherwise fetches current conditions for the location.
#[utoipa::path(
    post,
    path = "/api/solar/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Prediction, wrapped in the success envelope", body = PredictionPayload),
        (status = 400, description = "Invalid request parameters"),
        (status = 502, description = "Weather provider error"),
        (status = 503, description = "Weather provider not configured")
    )
)]
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PredictionPayload>>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::invalid("Invalid request parameters", e.body_text()))?;
    req.validate()
        .map_err(|detail| ApiError::invalid("Invalid request parameters", detail))?;

    let observation = match req.weather_data.clone() {
        Some(obs) => obs,
        None => live_observation(&state, &req.location).await?,
    };

    let predictions = yield_estimator::estimate(&observation.snapshot(), &req.panel());
    info!(
        location = %req.location,
        power_kw = predictions.current_power,
        daily_kwh = predictions.daily_energy,
        "prediction computed"
    );

    Ok(ApiResponse::ok(PredictionPayload {
        location: req.location,
        predictions,
        timestamp: Utc::now(),
        algorithm: ALGORITHM.to_string(),
    }))
}

/// Current conditions for a known city, with irradiance derived from them.
async fn live_observation(state: &AppState, location: &str) -> Result<WeatherObservation, ApiError> {
    let profile = state.climate.get(location).ok_or_else(|| {
        ApiError::bad_request("weatherData is required for locations outside the supported city list")
    })?;
    let mut obs = state.weather.current(profile.latitude, profile.longitude).await?;
    obs.solar_irradiance = Some(irradiance_from_conditions(&obs));
    Ok(obs)
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<String>,
}

/// GET /api/solar/historical/{location}
/// Synthesized daily history
///
/// Returns `days` records (default 30) ending today. Unknown locations use the Mumbai profile.
#[utoipa::path(
    get,
    path = "/api/solar/historical/{location}",
    params(
        ("location" = String, Path, description = "City name"),
        ("days" = Option<u32>, Query, description = "Number of days, default 30")
    ),
    responses(
        (status = 200, description = "Historical series, wrapped in the success envelope", body = HistoricalPayload),
        (status = 400, description = "days is not a positive integer within the allowed window")
    )
)]
pub async fn get_historical(
    Path(location): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HistoricalPayload>>, ApiError> {
    let history = &state.config.history;
    let days = parse_days(query.days.as_deref(), history.default_days, history.max_days)?;

    let data = {
        let mut rng = rand::rng();
        HistorySynthesizer::new(&state.climate).synthesize(&location, days, Local::now().date_naive(), &mut rng)
    };
    debug!(%location, days, "historical series synthesized");

    Ok(ApiResponse::ok(HistoricalPayload { location, days, data }))
}

/// Parses the `days` query value; absent means `default`.
pub fn parse_days(raw: Option<&str>, default: u32, max: u32) -> Result<u32, ApiError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(d) if d >= 1 && d <= max as i64 => Ok(d as u32),
        _ => Err(ApiError::invalid(
            "Invalid days parameter",
            format!("\"days\" must be an integer between 1 and {}", max),
        )),
    }
}

/// POST /api/solar/calculator-requirements
/// Size a system for an appliance load
#[utoipa::path(
    post,
    path = "/api/solar/calculator-requirements",
    request_body = SizingRequest,
    responses(
        (status = 200, description = "Sizing result, wrapped in the success envelope", body = SizingResult),
        (status = 400, description = "Missing location, or daily demand not positive or above 100000 kWh")
    )
)]
pub async fn calculator_requirements(
    State(state): State<AppState>,
    body: Result<Json<SizingRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SizingResult>>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::invalid("Missing required parameters", e.body_text()))?;
    if req.location.trim().is_empty() {
        return Err(ApiError::bad_request("Missing required parameters"));
    }
    sizing_calculator::checked_demand_kwh(&req).map_err(|e| match e {
        DemandError::NotPositive => ApiError::invalid("Missing required parameters", e.to_string()),
        DemandError::TooLarge => ApiError::invalid("Invalid request parameters", e.to_string()),
    })?;

    Ok(ApiResponse::ok(sizing_calculator::size_system(&state.climate, &req)))
}

/// GET /api/solar/maharashtra-potential
/// Solar resource summary for every supported city
#[utoipa::path(
    get,
    path = "/api/solar/maharashtra-potential",
    responses(
        (status = 200, description = "Map of city name to solar potential", body = BTreeMap<String, SolarPotential>)
    )
)]
pub async fn get_potential(State(state): State<AppState>) -> Json<ApiResponse<BTreeMap<String, SolarPotential>>> {
    let potential = state.climate.iter()
        .map(|p| (p.name.clone(), SolarPotential::from(p)))
        .collect();
    ApiResponse::ok(potential)
}

/// GET /api/solar/optimal-config/{location}
/// Recommended tilt, azimuth and capacity
///
/// Unknown locations get the standard configuration.
#[utoipa::path(
    get,
    path = "/api/solar/optimal-config/{location}",
    params(
        ("location" = String, Path, description = "City name")
    ),
    responses(
        (status = 200, description = "Recommended configuration", body = OptimalConfigPayload)
    )
)]
pub async fn get_optimal_config(
    Path(location): Path<String>,
    State(state): State<AppState>,
) -> Json<ApiResponse<OptimalConfigPayload>> {
    let config = state.climate.optimal_config(&location);
    ApiResponse::ok(OptimalConfigPayload::new(location, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days(None, 30, 3650).unwrap(), 30);
        assert_eq!(parse_days(Some("7"), 30, 3650).unwrap(), 7);
        assert_eq!(parse_days(Some(" 365 "), 30, 3650).unwrap(), 365);
        assert!(parse_days(Some("0"), 30, 3650).is_err());
        assert!(parse_days(Some("-3"), 30, 3650).is_err());
        assert!(parse_days(Some("2.5"), 30, 3650).is_err());
        assert!(parse_days(Some("ten"), 30, 3650).is_err());
        assert!(parse_days(Some("3651"), 30, 3650).is_err());
    }
}
