use thiserror::Error;

use crate::models::{MeasurementMethod, ReferenceDataset, Sex};

/// Error type for growth reference lookups
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    /// The reference holds no data for this combination
    #[error("No {method} data for {sex} children in the {dataset} reference")]
    UnsupportedCombination {
        dataset: ReferenceDataset,
        sex: Sex,
        method: MeasurementMethod,
    },

    /// Requested age lies outside the span covered by the reference
    #[error("Age {age:.2} years is outside the {dataset} {method} reference range ({min:.2}-{max:.2} years)")]
    AgeOutOfRange {
        dataset: ReferenceDataset,
        method: MeasurementMethod,
        age: f64,
        min: f64,
        max: f64,
    },

    /// Observation cannot be scored (non-finite or non-positive)
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    /// Reference data could not be understood
    #[error("Malformed reference data: {0}")]
    Malformed(String),

    /// Reference data could not be read
    #[error("Reference data unavailable: {0}")]
    Io(String),
}

impl From<serde_json::Error> for ReferenceError {
    fn from(error: serde_json::Error) -> Self {
        ReferenceError::Malformed(error.to_string())
    }
}

impl From<std::io::Error> for ReferenceError {
    fn from(error: std::io::Error) -> Self {
        ReferenceError::Io(error.to_string())
    }
}
