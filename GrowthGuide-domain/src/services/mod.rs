pub mod age;
pub mod bmi;
pub mod bsa;
pub mod chart;
pub mod gestation;
pub mod gh_dose;
pub mod growth;
pub mod mid_parental;
pub mod sds_gate;
pub mod velocity;

// Domain services
// Calculators are pure functions; `growth` composes them per request.

// Re-export service traits and factory functions
pub use growth::{
    create_default_growth_service, create_growth_service, GrowthService, GrowthServiceError,
    GrowthServiceTrait,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use growth::create_mock_growth_service;

/// Round half away from zero to `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.82295, 2), 0.82);
        assert_eq!(round_to(29.938_524, 1), 29.9);
        assert_eq!(round_to(-1.236, 2), -1.24);
    }
}
