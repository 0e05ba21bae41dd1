// Reference module structure
pub mod errors;
pub mod lms;
mod provider;

// Re-export commonly used types
pub use errors::ReferenceError;
pub use lms::{
    normal_cdf, sds_to_centile, LmsReference, LmsRow, LmsTable, REFERENCE_PATH_ENV,
};
pub use provider::{GrowthReferenceTrait, ReferenceSummary};

// Re-export test doubles for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use provider::tests;
