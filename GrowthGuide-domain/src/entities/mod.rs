// Domain entities and value objects
pub mod chart;
pub mod conversions;
pub mod growth;
pub mod measurement;
pub mod patient;

// Re-export common types for easier imports
pub use chart::{ChartRequest, ChartSeries, OverlayKind, OverlayPoint};
pub use growth::{
    AgeResult, BoneAgeResult, BsaMethod, BsaResult, CalculationResult, CalendarAge, GhDose,
    HeightVelocityResult, MeasurementResult, MidParentalHeightResult, PreviousMeasurementResult,
    SdsPoint, ValidationOutcome, ValidationStatus,
};
pub use measurement::{
    AgeRange, BoneAgeAssessment, CalculationOptions, CalculationRequest, Measurement,
    PreviousMeasurement,
};
pub use patient::{Gestation, PatientContext};
