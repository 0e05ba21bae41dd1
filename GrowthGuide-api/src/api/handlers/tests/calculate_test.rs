#[cfg(test)]
mod calculate_tests {
    use std::sync::Arc;

    use axum::{body::to_bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
    use chrono::NaiveDate;
    use serde_json::Value;

    use growth_guide_domain::entities::CalculationRequest;
    use growth_guide_domain::models::{MeasurementMethod, Sex};
    use growth_guide_domain::services::GrowthServiceError;
    use growth_guide_domain::testing::MockGrowthService;

    use crate::api::handlers::calculate::{calculate, map_service_error, GrowthServiceHandle};
    use crate::api::handlers::chart::chart_data;
    use crate::entities::ChartDataRequest;

    fn request() -> CalculationRequest {
        let mut request = CalculationRequest::new(
            Sex::Male,
            NaiveDate::from_ymd_opt(2018, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        );
        request.weight = Some(20.0);
        request.height = Some(120.0);
        request
    }

    async fn body_of(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_calculate_returns_results() {
        let service: GrowthServiceHandle = Arc::new(MockGrowthService::new());

        let response = calculate(State(service), Ok(Json(request())))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_of(response).await;
        assert_eq!(body["weight"]["sds"], 0.0);
        assert_eq!(body["bsa"]["value"], 0.82);
        assert_eq!(body["gh_dose"]["mcg_kg_day"], 40.0);
    }

    #[tokio::test]
    async fn test_calculate_validation_failure_is_bad_request() {
        let service: GrowthServiceHandle = Arc::new(MockGrowthService::new().with_validation_failure());

        let response = calculate(State(service), Ok(Json(request())))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_calculate_without_scorable_measurements_is_unprocessable() {
        let service: GrowthServiceHandle = Arc::new(MockGrowthService::new().with_calculation_failure());

        let response = calculate(State(service), Ok(Json(request())))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_of(response).await["error"], "no_valid_measurements");
    }

    #[test]
    fn test_validation_messages_become_details() {
        let error = map_service_error(GrowthServiceError::ValidationError(
            "weight: Weight must be between 0.1 and 300 kg; Measurement date must be after birth date"
                .to_string(),
        ));
        assert_eq!(error.details.map(|d| d.len()), Some(2));
    }

    #[tokio::test]
    async fn test_chart_data_adds_calculated_overlays() {
        let service: GrowthServiceHandle = Arc::new(MockGrowthService::new());
        let chart_request = ChartDataRequest {
            reference: None,
            method: MeasurementMethod::Weight,
            sex: Sex::Male,
            age_range: None,
            overlays: Vec::new(),
            calculation: Some(request()),
        };

        let response = chart_data(State(service), Ok(Json(chart_request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_of(response).await;
        assert_eq!(body["reference"], "uk-who");
        assert_eq!(body["centiles"].as_array().unwrap().len(), 9);
        let overlays = body["overlays"].as_array().unwrap();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0]["kind"], "current");
        assert_eq!(overlays[0]["value"], 20.0);
    }
}
