// GrowthGuide Domain
// This crate contains the growth calculation logic for the GrowthGuide application

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the reference layer for convenience
pub use growth_guide_data::{models, reference};

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
