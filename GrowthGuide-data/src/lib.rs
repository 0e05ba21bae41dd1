// GrowthGuide Data
// This crate handles access to the external growth reference service

// Reference service seam and its implementations
pub mod reference;

// Reference vocabulary shared with the domain layer
pub mod models;
