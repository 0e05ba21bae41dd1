use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use growth_guide_data::models::Sex;

/// Days of gestation treated as full term (40 weeks)
pub const FULL_TERM_DAYS: i64 = 280;

/// Gestational age at birth
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Gestation {
    /// Completed weeks of gestation
    pub weeks: u8,

    /// Additional days beyond the completed weeks (0-6)
    pub days: u8,
}

impl Gestation {
    pub fn new(weeks: u8, days: u8) -> Self {
        Self { weeks, days }
    }

    /// Total gestation in days
    pub fn total_days(&self) -> i64 {
        i64::from(self.weeks) * 7 + i64::from(self.days)
    }

    /// Days between birth and the expected due date
    pub fn days_premature(&self) -> i64 {
        FULL_TERM_DAYS - self.total_days()
    }
}

/// Demographic context shared by every measurement in a request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PatientContext {
    pub sex: Sex,

    /// Date of birth
    pub birth_date: NaiveDate,

    /// Gestation at birth, when known
    pub gestation: Option<Gestation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_premature() {
        assert_eq!(Gestation::new(40, 0).days_premature(), 0);
        assert_eq!(Gestation::new(32, 0).days_premature(), 56);
        assert_eq!(Gestation::new(28, 3).days_premature(), 81);
    }
}
