use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use growth_guide_domain::entities::{CalculationRequest, CalculationResult};
use growth_guide_domain::services::{GrowthServiceError, GrowthServiceTrait};

use crate::entities::ErrorResponse;

/// Service type for dependency injection
pub type GrowthServiceHandle = Arc<dyn GrowthServiceTrait + Send + Sync>;

/// Map domain errors to API error responses
pub fn map_service_error(error: GrowthServiceError) -> ErrorResponse {
    match error {
        GrowthServiceError::ValidationError(message) => {
            warn!("Invalid calculation request: {}", message);
            let details = message.split("; ").map(str::to_string).collect();
            ErrorResponse::validation_error("Invalid calculation request", Some(details))
        }
        GrowthServiceError::NoValidMeasurements(messages) => {
            warn!("No measurement could be scored: {}", messages.join("; "));
            ErrorResponse::no_valid_measurements(messages)
        }
    }
}

/// Map body extraction failures to API error responses
pub fn map_json_rejection(rejection: JsonRejection) -> ErrorResponse {
    warn!("Rejected request body: {}", rejection.body_text());
    ErrorResponse::bad_request(&rejection.body_text())
}

/// Validate and run a calculation request
pub fn run_calculation(
    service: &GrowthServiceHandle,
    request: &CalculationRequest,
) -> Result<CalculationResult, ErrorResponse> {
    service
        .validate_calculation_request(request)
        .map_err(map_service_error)?;
    service.calculate(request).map_err(map_service_error)
}

/// Score a set of measurements for one patient
#[utoipa::path(
    post,
    path = "/api/v1/calculate",
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Measurements scored", body = CalculationResult),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "No measurement could be scored", body = ErrorResponse),
    ),
    tag = "growth"
)]
#[instrument(skip(service, payload), fields(request_id = %Uuid::new_v4()))]
pub async fn calculate(
    State(service): State<GrowthServiceHandle>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(request) = payload.map_err(map_json_rejection)?;
    info!("Calculating growth results");

    let result = run_calculation(&service, &request)?;

    info!(
        "Calculation returned {} warnings against {}",
        result.warnings.len(),
        result.reference
    );
    Ok((StatusCode::OK, Json(result)))
}
