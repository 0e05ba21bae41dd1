//! Chronological age between two calendar dates.
//!
//! Whole calendar months are counted first (clamping to the end of shorter
//! months) and the remaining days are converted with an average 365.25-day
//! year, so same-day anniversaries give exact whole years even across leap
//! years.

use chrono::{Datelike, Months, NaiveDate};

use crate::entities::{AgeResult, CalendarAge};

pub const DAYS_PER_YEAR: f64 = 365.25;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Age at `observation_date` for someone born on `birth_date`.
///
/// An observation before `birth_date` yields a negative decimal age; the
/// calendar breakdown then holds the magnitude of the gap.
pub fn calculate_age(birth_date: NaiveDate, observation_date: NaiveDate) -> AgeResult {
    if observation_date < birth_date {
        let calendar = calendar_between(observation_date, birth_date);
        return AgeResult {
            decimal_years: -decimal_years(&calendar),
            calendar,
        };
    }

    let calendar = calendar_between(birth_date, observation_date);
    AgeResult {
        decimal_years: decimal_years(&calendar),
        calendar,
    }
}

fn decimal_years(calendar: &CalendarAge) -> f64 {
    f64::from(calendar.years)
        + f64::from(calendar.months) / MONTHS_PER_YEAR
        + f64::from(calendar.days) / DAYS_PER_YEAR
}

/// Calendar breakdown of `start..=end`; requires `start <= end`
fn calendar_between(start: NaiveDate, end: NaiveDate) -> CalendarAge {
    let anchor = |months: u32| start.checked_add_months(Months::new(months));

    let span = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let mut months = span.max(0) as u32;
    while months > 0 && anchor(months).map_or(true, |date| date > end) {
        months -= 1;
    }

    let base = anchor(months).unwrap_or(start);
    let days = (end - base).num_days().max(0) as u32;

    CalendarAge {
        years: months / 12,
        months: months % 12,
        days,
    }
}
