use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Growth endpoints
        crate::api::handlers::calculate::calculate,
        crate::api::handlers::chart::chart_data,
    ),
    components(
        schemas(
            // API entities
            crate::entities::ErrorResponse,
            crate::entities::ChartDataRequest,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Reference vocabulary
            growth_guide_data::models::Sex,
            growth_guide_data::models::MeasurementMethod,
            growth_guide_data::models::ReferenceDataset,
            growth_guide_data::models::CentileCurve,
            growth_guide_data::models::CentilePoint,

            // Calculation entities
            growth_guide_domain::entities::CalculationRequest,
            growth_guide_domain::entities::CalculationOptions,
            growth_guide_domain::entities::PreviousMeasurement,
            growth_guide_domain::entities::BoneAgeAssessment,
            growth_guide_domain::entities::AgeRange,
            growth_guide_domain::entities::CalculationResult,
            growth_guide_domain::entities::AgeResult,
            growth_guide_domain::entities::CalendarAge,
            growth_guide_domain::entities::MeasurementResult,
            growth_guide_domain::entities::SdsPoint,
            growth_guide_domain::entities::ValidationStatus,
            growth_guide_domain::entities::ValidationOutcome,
            growth_guide_domain::entities::BsaMethod,
            growth_guide_domain::entities::BsaResult,
            growth_guide_domain::entities::HeightVelocityResult,
            growth_guide_domain::entities::MidParentalHeightResult,
            growth_guide_domain::entities::GhDose,
            growth_guide_domain::entities::PreviousMeasurementResult,
            growth_guide_domain::entities::BoneAgeResult,

            // Chart entities
            growth_guide_domain::entities::ChartSeries,
            growth_guide_domain::entities::OverlayKind,
            growth_guide_domain::entities::OverlayPoint,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "growth", description = "Growth measurement scoring and chart data")
    ),
    info(
        title = "GrowthGuide API",
        version = "0.1.0",
        description = "Paediatric growth measurement scoring, prematurity correction and chart data",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
