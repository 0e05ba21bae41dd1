pub mod calculate;
pub mod chart;
pub mod health;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use calculate::calculate;
pub use chart::chart_data;
pub use health::health_check;
