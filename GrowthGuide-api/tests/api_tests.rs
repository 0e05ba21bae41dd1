use std::sync::{Arc, Once};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use growth_guide_api::api::routes::create_router;
use growth_guide_api::config::AppConfig;
use growth_guide_domain::models::MeasurementMethod;
use growth_guide_domain::testing::{MockGrowthService, MockHealthService, StubGrowthReference};

// Ensure tracing is initialized only once
static INIT: Once = Once::new();

fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn app_with(growth: MockGrowthService, health: MockHealthService) -> Router {
    initialize();
    create_router(Arc::new(growth), Arc::new(health), AppConfig::default())
}

fn test_app() -> Router {
    app_with(MockGrowthService::new(), MockHealthService::new())
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn school_age_body() -> Value {
    json!({
        "sex": "male",
        "birth_date": "2018-03-10",
        "measurement_date": "2024-03-10",
        "weight": 20.0,
        "height": 120.0,
        "maternal_height": 160.0,
        "paternal_height": 180.0
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(test_app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "development");
}

#[tokio::test]
async fn test_calculate_endpoint() {
    let (status, body) = send(test_app(), Method::POST, "/api/v1/calculate", Some(school_age_body())).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["reference"], "uk-who");
    assert_eq!(body["age"]["decimal_years"], 6.0);
    assert_eq!(body["weight"]["centile"], 50.0);
    assert_eq!(body["bmi"]["value"], 13.9);
    assert_eq!(body["bsa"]["value"], 0.82);
    assert_eq!(body["gh_dose"]["mg_per_day"], 0.8);
    assert_eq!(body["mid_parental_height"]["value"], 176.5);
    assert_eq!(body["mid_parental_height"]["target_range_lower"], 166.5);
    assert_eq!(body["warnings"], json!([]));
}

#[tokio::test]
async fn test_calculate_rejects_malformed_json() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/calculate")
        .header("content-type", "application/json")
        .body(Body::from("{\"sex\": \"male\", "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_calculate_rejects_unknown_sex() {
    let mut body = school_age_body();
    body["sex"] = json!("unknown");

    let (status, body) = send(test_app(), Method::POST, "/api/v1/calculate", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_calculate_reports_validation_details() {
    let body = json!({
        "sex": "female",
        "birth_date": "2020-01-01",
        "measurement_date": "2019-06-01",
        "weight": 500.0
    });

    let (status, body) = send(test_app(), Method::POST, "/api/v1/calculate", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    let details: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d.as_str())
        .collect();
    assert!(details.iter().any(|d| d.contains("Weight must be between 0.1 and 300 kg")));
}

#[tokio::test]
async fn test_calculate_with_every_measurement_rejected() {
    let reference = StubGrowthReference::new()
        .with_sds(MeasurementMethod::Weight, 12.0)
        .with_sds(MeasurementMethod::Height, -9.0)
        .with_sds(MeasurementMethod::Bmi, 20.0);
    let app = app_with(MockGrowthService::with_reference(reference), MockHealthService::new());

    let (status, body) = send(app, Method::POST, "/api/v1/calculate", Some(school_age_body())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "no_valid_measurements");
    assert_eq!(body["details"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_chart_data_endpoint() {
    let body = json!({
        "method": "height",
        "sex": "male",
        "age_range": { "min": 2.0, "max": 8.0 },
        "calculation": school_age_body()
    });

    let (status, body) = send(test_app(), Method::POST, "/api/v1/chart-data", Some(body)).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], Value::Null);
    let centiles = body["centiles"].as_array().unwrap();
    assert_eq!(centiles.len(), 9);
    for curve in centiles {
        for point in curve["points"].as_array().unwrap() {
            let age = point["age"].as_f64().unwrap();
            assert!((2.0..=8.0).contains(&age));
        }
    }
    assert_eq!(body["overlays"][0]["kind"], "current");
    assert_eq!(body["overlays"][0]["value"], 120.0);
}

#[tokio::test]
async fn test_chart_data_rejects_inverted_range() {
    let body = json!({
        "method": "weight",
        "sex": "female",
        "age_range": { "min": 10.0, "max": 2.0 }
    });

    let (status, body) = send(test_app(), Method::POST, "/api/v1/chart-data", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_chart_data_without_reference_data() {
    let reference = StubGrowthReference::new().with_failure(MeasurementMethod::Ofc);
    let app = app_with(MockGrowthService::with_reference(reference), MockHealthService::new());
    let body = json!({ "method": "ofc", "sex": "female", "reference": "cdc" });

    let (status, body) = send(app, Method::POST, "/api/v1/chart-data", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reference"], "cdc");
    assert_eq!(body["centiles"], json!([]));
    assert!(body["message"].as_str().unwrap().starts_with("Centile data unavailable"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = send(test_app(), Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/calculate"].is_object());
}
