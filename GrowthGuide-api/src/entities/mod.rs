// Public entities for the GrowthGuide API
// Calculation requests and results are served as the domain types; this
// module holds the shapes that exist only at the HTTP boundary.

// Chart data request
pub mod chart;

// Common entities for error handling
pub mod common;

pub use chart::{convert_to_domain_chart_request, ChartDataRequest};
pub use common::ErrorResponse;
