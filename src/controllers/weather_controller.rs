use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use tracing::info;

use crate::errors::{ApiError, ApiResponse};
use crate::models::location::LocationClimateProfile;
use crate::models::solar::check_location;
use crate::models::weather::{EnhancedForecast, EnhancedWeather, ForecastEntry};
use crate::services::weather_service::{in_maharashtra, irradiance_from_conditions, is_monsoon_season, solar_potential};
use crate::shared_state::AppState;

const UNSUPPORTED_CITY: &str =
    "Only Maharashtra cities are supported. Please select a city from Maharashtra.";

fn supported_city<'a>(state: &'a AppState, location: &str) -> Result<&'a LocationClimateProfile, ApiError> {
    check_location(location).map_err(|detail| ApiError::invalid("Invalid location parameter", detail))?;
    state.climate.get(location).ok_or_else(|| ApiError::bad_request(UNSUPPORTED_CITY))
}

/// GET /api/weather/current/{location}
/// Current weather for a supported city
///
/// Provider payload plus `solarIrradiance`, `isMaharashtraCity` and `monsoonSeason`.
#[utoipa::path(
    get,
    path = "/api/weather/current/{location}",
    params(
        ("location" = String, Path, description = "City name, case-sensitive")
    ),
    responses(
        (status = 200, description = "Enhanced current weather"),
        (status = 400, description = "Unsupported city"),
        (status = 502, description = "Weather provider error")
    )
)]
pub async fn get_current(
    Path(location): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EnhancedWeather>>, ApiError> {
    let (lat, lon) = {
        let city = supported_city(&state, &location)?;
        (city.latitude, city.longitude)
    };
    let mut observation = state.weather.current(lat, lon).await?;
    let irradiance = irradiance_from_conditions(&observation);
    observation.solar_irradiance = Some(irradiance);
    info!(%location, irradiance, "current weather fetched");

    Ok(ApiResponse::ok(EnhancedWeather {
        observation,
        is_maharashtra_city: true,
        monsoon_season: is_monsoon_season(Local::now().date_naive()),
    }))
}

/// GET /api/weather/forecast/{location}
/// 5-day forecast with per-slot solar potential
#[utoipa::path(
    get,
    path = "/api/weather/forecast/{location}",
    params(
        ("location" = String, Path, description = "City name, case-sensitive")
    ),
    responses(
        (status = 200, description = "Forecast, each entry with solarIrradiance and solarPotential"),
        (status = 400, description = "Unsupported city"),
        (status = 502, description = "Weather provider error")
    )
)]
pub async fn get_forecast(
    Path(location): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EnhancedForecast>>, ApiError> {
    let (lat, lon) = {
        let city = supported_city(&state, &location)?;
        (city.latitude, city.longitude)
    };
    let forecast = state.weather.forecast(lat, lon).await?;

    let list = forecast.list.into_iter()
        .map(|mut observation| {
            let solar_potential = solar_potential(&observation);
            observation.solar_irradiance = Some(solar_potential.irradiance);
            ForecastEntry { observation, solar_potential }
        })
        .collect::<Vec<_>>();
    info!(%location, slots = list.len(), "forecast fetched");

    Ok(ApiResponse::ok(EnhancedForecast { list, rest: forecast.rest }))
}

/// GET /api/weather/maharashtra-cities
/// Supported city names
#[utoipa::path(
    get,
    path = "/api/weather/maharashtra-cities",
    responses(
        (status = 200, description = "City names", body = Vec<String>)
    )
)]
pub async fn list_cities(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    ApiResponse::ok(state.climate.names().to_vec())
}

/// GET /api/weather/coordinates/{lat}/{lon}
/// Current weather at a coordinate inside Maharashtra
#[utoipa::path(
    get,
    path = "/api/weather/coordinates/{lat}/{lon}",
    params(
        ("lat" = f64, Path, description = "Latitude"),
        ("lon" = f64, Path, description = "Longitude")
    ),
    responses(
        (status = 200, description = "Enhanced current weather"),
        (status = 400, description = "Coordinates outside Maharashtra"),
        (status = 502, description = "Weather provider error")
    )
)]
pub async fn get_by_coordinates(
    Path((lat, lon)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EnhancedWeather>>, ApiError> {
    let (lat, lon) = match (lat.parse::<f64>(), lon.parse::<f64>()) {
        (Ok(lat), Ok(lon)) if lat.is_finite() && lon.is_finite() => (lat, lon),
        _ => return Err(ApiError::bad_request("Latitude and longitude must be numbers")),
    };
    if !in_maharashtra(lat, lon) {
        return Err(ApiError::bad_request("Only locations within Maharashtra are supported."));
    }

    let mut observation = state.weather.current(lat, lon).await?;
    observation.solar_irradiance = Some(irradiance_from_conditions(&observation));

    Ok(ApiResponse::ok(EnhancedWeather {
        observation,
        is_maharashtra_city: true,
        monsoon_season: is_monsoon_season(Local::now().date_naive()),
    }))
}
