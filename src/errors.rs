use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::services::weather_service::WeatherError;

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Failures surfaced by the HTTP layer. The estimators themselves never fail.
#[derive(Debug)]
pub enum ApiError {
    /// 400, with an optional detail line
    BadRequest { message: String, detail: Option<String> },
    NotFound(String),
    /// 502, the weather provider failed
    Upstream(String),
    /// 503, a dependency is not configured
    Unavailable(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into(), detail: None }
    }

    pub fn invalid(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into(), detail: Some(detail.into()) }
    }
}

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::NotConfigured => ApiError::Unavailable("Weather provider is not configured".to_string()),
            WeatherError::NotFound => ApiError::NotFound("Location not found".to_string()),
            other => {
                warn!(error = %other, "weather lookup failed");
                ApiError::Upstream("Error fetching weather data".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error) = match self {
            ApiError::BadRequest { message, detail } => (StatusCode::BAD_REQUEST, message, detail),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            ApiError::Upstream(message) => (StatusCode::BAD_GATEWAY, message, None),
            ApiError::Unavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message, None),
        };
        (status, Json(ErrorBody { success: false, message, error })).into_response()
    }
}
