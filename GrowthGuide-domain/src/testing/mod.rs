// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export the reference double from the data layer
pub use growth_guide_data::reference::tests::StubGrowthReference;

use std::collections::HashMap;

use async_trait::async_trait;
use growth_guide_data::models::{MeasurementMethod, ReferenceDataset};
use growth_guide_data::reference::ReferenceSummary;

use crate::entities::{CalculationRequest, CalculationResult, ChartRequest, ChartSeries};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus};
use crate::services::{GrowthService, GrowthServiceError, GrowthServiceTrait};

/// Mock implementation of the GrowthServiceTrait for testing.
///
/// Calculations run the real pipeline over a `StubGrowthReference`, so every
/// measurement scores at a fixed SDS unless configured otherwise.
pub struct MockGrowthService {
    inner: GrowthService<StubGrowthReference>,
    should_fail_validation: bool,
    should_fail_calculation: bool,
}

impl Default for MockGrowthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGrowthService {
    /// Create a new mock growth service scoring everything at SDS 0
    pub fn new() -> Self {
        Self::with_reference(StubGrowthReference::new().with_median(MeasurementMethod::Bmi, 16.0))
    }

    /// Create a mock over a specific stub reference
    pub fn with_reference(reference: StubGrowthReference) -> Self {
        Self {
            inner: GrowthService::new(reference),
            should_fail_validation: false,
            should_fail_calculation: false,
        }
    }

    /// Configure the mock to fail validation
    pub fn with_validation_failure(mut self) -> Self {
        self.should_fail_validation = true;
        self
    }

    /// Configure the mock to reject every measurement
    pub fn with_calculation_failure(mut self) -> Self {
        self.should_fail_calculation = true;
        self
    }
}

impl GrowthServiceTrait for MockGrowthService {
    fn validate_calculation_request(
        &self,
        request: &CalculationRequest,
    ) -> Result<(), GrowthServiceError> {
        if self.should_fail_validation {
            Err(GrowthServiceError::ValidationError(
                "Validation failed - mock is configured to fail validation".to_string(),
            ))
        } else {
            self.inner.validate_calculation_request(request)
        }
    }

    fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResult, GrowthServiceError> {
        if self.should_fail_calculation {
            return Err(GrowthServiceError::NoValidMeasurements(vec![
                "Calculation failed - mock is configured to reject all measurements".to_string(),
            ]));
        }
        self.inner.calculate(request)
    }

    fn chart_series(&self, request: &ChartRequest) -> ChartSeries {
        self.inner.chart_series(request)
    }

    fn default_reference(&self) -> ReferenceDataset {
        self.inner.default_reference()
    }

    fn reference_summary(&self) -> ReferenceSummary {
        self.inner.reference_summary()
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    /// Reference component status
    reference_status: ComponentStatus,
    /// System status
    system_status: SystemStatus,
    /// Additional components
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            reference_status: ComponentStatus::Healthy,
            system_status: SystemStatus::Healthy,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with an empty reference
    pub fn with_degraded_reference(mut self) -> Self {
        self.reference_status = ComponentStatus::Degraded;
        self.system_status = SystemStatus::Degraded;
        self
    }

    /// Set the overall system status
    pub fn with_system_status(mut self, status: SystemStatus) -> Self {
        self.system_status = status;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        components.insert(
            "reference".to_string(),
            HealthComponent {
                status: self.reference_status.clone(),
                details: match self.reference_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("No reference tables loaded".to_string()),
                    ComponentStatus::Unhealthy => Some("Reference unavailable".to_string()),
                },
            },
        );

        for (name, component) in &self.components {
            components.insert(name.clone(), component.clone());
        }

        SystemHealth {
            status: self.system_status.clone(),
            components,
        }
    }

    async fn check_reference_status(&self) -> Result<bool, String> {
        match self.reference_status {
            ComponentStatus::Healthy => Ok(true),
            ComponentStatus::Degraded => Ok(false),
            ComponentStatus::Unhealthy => Err("Reference unavailable".to_string()),
        }
    }
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> impl HealthServiceTrait {
    MockHealthService::new()
}
