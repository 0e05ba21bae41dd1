use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use growth_guide_domain::services::create_default_growth_service;

use crate::api::handlers::calculate::GrowthServiceHandle;
use crate::api::handlers::health::{self, HealthServiceHandle};
use crate::api::handlers::{calculate, chart};
use crate::config::AppConfig;
use crate::openapi::configure_swagger_routes;

/// Create the application router backed by the configured growth reference
pub fn create_app(config: AppConfig) -> Router {
    debug!("Creating application router");

    // Create growth service using factory function
    let growth_service: GrowthServiceHandle =
        Arc::new(create_default_growth_service(config.default_reference));

    let summary = growth_service.reference_summary();
    info!(
        "Growth reference {} with {} tables; default dataset {}",
        summary.source, summary.table_count, config.default_reference
    );

    // Create health service using factory function
    let health_service = health::create_health_service(summary);

    create_router(growth_service, health_service, config)
}

/// Assemble routes around the given services
pub fn create_router(
    growth_service: GrowthServiceHandle,
    health_service: HealthServiceHandle,
    config: AppConfig,
) -> Router {
    let api_routes = Router::new()
        .route("/calculate", post(calculate::calculate))
        .route("/chart-data", post(chart::chart_data))
        .with_state(growth_service);

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service))
        .layer(Extension(Arc::new(config)));

    debug!("Public routes configured");

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes);

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    // Initialize health check service startup time
    health::initialize_server_start_time();

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    // Get Swagger UI routes
    let swagger = configure_swagger_routes();

    // Merge Swagger UI with the app router
    app.merge(swagger)
}
