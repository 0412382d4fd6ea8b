use utoipa::OpenApi;
use crate::controllers::{solar_controller, system_controller, weather_controller};
use crate::models::{location, solar, weather};

#[derive(OpenApi)]
#[openapi(
    paths(
        system_controller::health,
        solar_controller::predict,
        solar_controller::get_historical,
        solar_controller::calculator_requirements,
        solar_controller::get_potential,
        solar_controller::get_optimal_config,
        weather_controller::get_current,
        weather_controller::get_forecast,
        weather_controller::list_cities,
        weather_controller::get_by_coordinates
    ),
    components(
        schemas(
            solar::PredictRequest,
            solar::PredictionPayload,
            solar::PredictionResult,
            solar::Financials,
            solar::WeatherFactors,
            solar::HistoricalPayload,
            solar::HistoricalRecord,
            solar::WeatherCondition,
            solar::Appliance,
            solar::SizingRequest,
            solar::SizingResult,
            solar::ApplianceShare,
            solar::OptimalConfigPayload,
            solar::HealthStatus,
            location::SolarPotential,
            weather::SolarPotentialEstimate
        )
    ),
    tags(
        (name = "solar-yield-api", description = "Weather-driven solar yield estimation API")
    )
)]
pub struct ApiDoc;
