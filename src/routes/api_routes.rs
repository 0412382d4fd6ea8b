use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::controllers::solar_controller::{
    calculator_requirements, get_historical, get_optimal_config, get_potential, predict,
};
use crate::controllers::system_controller::{health, not_found};
use crate::controllers::weather_controller::{get_by_coordinates, get_current, get_forecast, list_cities};
use crate::shared_state::AppState;

/// `/api/solar/*`
fn solar_routes() -> Router<AppState> {
    Router::new()
        .route("/predict",                   post(predict))
        .route("/historical/{location}",     get(get_historical))
        .route("/calculator-requirements",   post(calculator_requirements))
        .route("/maharashtra-potential",     get(get_potential))
        .route("/optimal-config/{location}", get(get_optimal_config))
}

/// `/api/weather/*`
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/current/{location}",     get(get_current))
        .route("/forecast/{location}",    get(get_forecast))
        .route("/maharashtra-cities",     get(list_cities))
        .route("/coordinates/{lat}/{lon}", get(get_by_coordinates))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins.iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Full application router: health, `/api/*`, Scalar UI and the JSON 404 fallback.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/solar", solar_routes())
        .nest("/api/weather", weather_routes())
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
