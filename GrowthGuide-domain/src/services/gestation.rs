//! Prematurity correction.

use chrono::{Duration, NaiveDate};

use crate::entities::{AgeResult, Gestation};
use super::age::calculate_age;

/// Infants born before this many completed weeks are preterm
pub const PRETERM_THRESHOLD_WEEKS: u8 = 37;

/// Infants born before this many completed weeks are extremely preterm
pub const EXTREME_PRETERM_THRESHOLD_WEEKS: u8 = 32;

/// Correction stops at this chronological age for 32-36 week infants
pub const MODERATE_CORRECTION_LIMIT_YEARS: f64 = 1.0;

/// Correction stops at this chronological age for infants under 32 weeks
pub const EXTREME_CORRECTION_LIMIT_YEARS: f64 = 2.0;

/// Whether a corrected age should be reported.
///
/// Only completed weeks decide eligibility; `gestation_days` never moves an
/// infant across a threshold.
pub fn should_correct(gestation_weeks: u8, _gestation_days: u8, chronological_age_years: f64) -> bool {
    if gestation_weeks >= PRETERM_THRESHOLD_WEEKS {
        return false;
    }

    if gestation_weeks >= EXTREME_PRETERM_THRESHOLD_WEEKS {
        chronological_age_years < MODERATE_CORRECTION_LIMIT_YEARS
    } else {
        chronological_age_years < EXTREME_CORRECTION_LIMIT_YEARS
    }
}

/// Age since the expected due date (40 weeks gestation)
pub fn corrected_age(
    birth_date: NaiveDate,
    observation_date: NaiveDate,
    gestation_weeks: u8,
    gestation_days: u8,
) -> AgeResult {
    let days_premature = Gestation::new(gestation_weeks, gestation_days).days_premature();
    let due_date = birth_date + Duration::days(days_premature);
    calculate_age(due_date, observation_date)
}

/// Corrected age at `observation_date` when `gestation` makes the infant eligible
pub fn correction_for(
    gestation: Option<Gestation>,
    birth_date: NaiveDate,
    observation_date: NaiveDate,
    chronological_age_years: f64,
) -> Option<AgeResult> {
    let gestation = gestation?;
    if !should_correct(gestation.weeks, gestation.days, chronological_age_years) {
        return None;
    }
    Some(corrected_age(birth_date, observation_date, gestation.weeks, gestation.days))
}
