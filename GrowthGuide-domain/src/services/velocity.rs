//! Annualised height velocity between two observations.

use chrono::NaiveDate;

use crate::entities::HeightVelocityResult;
use super::age::DAYS_PER_YEAR;

/// Shortest interval (about four months) that gives a meaningful velocity
pub const MIN_VELOCITY_INTERVAL_DAYS: i64 = 122;

const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;

/// Height velocity in cm/year, or a message explaining why none is given
pub fn calculate_height_velocity(
    current_height: f64,
    current_date: NaiveDate,
    previous_height: f64,
    previous_date: NaiveDate,
) -> HeightVelocityResult {
    let elapsed_days = (current_date - previous_date).num_days();

    if elapsed_days <= 0 {
        return HeightVelocityResult::message(
            "Previous measurement date must be before current measurement date",
        );
    }

    if elapsed_days < MIN_VELOCITY_INTERVAL_DAYS {
        let months = elapsed_days as f64 / AVERAGE_DAYS_PER_MONTH;
        return HeightVelocityResult::message(format!(
            "Height velocity requires at least 4 months between measurements (current interval: {:.1} months)",
            months
        ));
    }

    HeightVelocityResult::value((current_height - previous_height) / elapsed_days as f64 * DAYS_PER_YEAR)
}

/// Previous height to measure velocity against.
///
/// The most recent height at least [`MIN_VELOCITY_INTERVAL_DAYS`] before
/// `current_date` wins. When none is that old, the most recent height is
/// returned so the interval message can explain the gap.
pub fn select_previous_height(
    current_date: NaiveDate,
    heights: impl IntoIterator<Item = (NaiveDate, f64)>,
) -> Option<(NaiveDate, f64)> {
    let mut heights: Vec<_> = heights.into_iter().collect();
    heights.sort_by_key(|(date, _)| *date);

    heights
        .iter()
        .rev()
        .find(|(date, _)| (current_date - *date).num_days() >= MIN_VELOCITY_INTERVAL_DAYS)
        .or_else(|| heights.last())
        .copied()
}
