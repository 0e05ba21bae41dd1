use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use growth_guide_domain::entities::ChartSeries;
use growth_guide_domain::services::chart::overlays_for;

use super::calculate::{map_json_rejection, run_calculation, GrowthServiceHandle};
use crate::entities::{convert_to_domain_chart_request, ChartDataRequest, ErrorResponse};

/// Centile lines and patient overlays for one growth chart
#[utoipa::path(
    post,
    path = "/api/v1/chart-data",
    request_body = ChartDataRequest,
    responses(
        (status = 200, description = "Chart series assembled; `message` is set when centile lines are unavailable", body = ChartSeries),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "No measurement in the attached calculation could be scored", body = ErrorResponse),
    ),
    tag = "growth"
)]
#[instrument(skip(service, payload), fields(request_id = %Uuid::new_v4()))]
pub async fn chart_data(
    State(service): State<GrowthServiceHandle>,
    payload: Result<Json<ChartDataRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(request) = payload.map_err(map_json_rejection)?;

    if let Some(range) = request.age_range {
        if !range.is_valid() {
            return Err(ErrorResponse::validation_error(
                "Invalid age range",
                Some(vec![format!(
                    "Minimum age ({}) must be below maximum age ({})",
                    range.min, range.max
                )]),
            ));
        }
    }

    let calculated = match &request.calculation {
        Some(calculation) => Some(run_calculation(&service, calculation)?),
        None => None,
    };

    let method = request.method;
    let mut chart_request = convert_to_domain_chart_request(request, service.default_reference());
    if let Some(result) = &calculated {
        let overlays = overlays_for(result, method);
        debug!("Adding {} calculated overlays", overlays.len());
        chart_request.overlays.extend(overlays);
    }

    info!("Assembling {} {} chart", chart_request.reference, method);
    let series = service.chart_series(&chart_request);
    Ok((StatusCode::OK, Json(series)))
}
